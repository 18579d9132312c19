use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use super::{check, SupabaseClient, SupabaseResult};

/// A PostgREST request against one table, built up filter by filter.
pub struct TableQuery<'a> {
    client: &'a SupabaseClient,
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
}

impl<'a> TableQuery<'a> {
    pub(super) fn new(client: &'a SupabaseClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq<V: ToString>(mut self, column: &str, value: V) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{}.{}", column, dir));
        self
    }

    fn params(&self, with_select: bool) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        if with_select {
            params.push(("select".to_string(), self.columns.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        params
    }

    fn request(&self, method: Method, with_select: bool) -> reqwest::RequestBuilder {
        self.client
            .service_request(method, &self.client.rest_url(&self.table))
            .query(&self.params(with_select))
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> SupabaseResult<Vec<T>> {
        tracing::debug!(table = %self.table, filters = ?self.filters, "select");
        let resp = self.request(Method::GET, true).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// First matching row, if any.
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> SupabaseResult<Option<T>> {
        Ok(self.fetch::<T>().await?.into_iter().next())
    }

    /// Inserts `rows`; success is judged by status alone, the stored rows are not read back.
    pub async fn insert<B: Serialize + ?Sized>(self, rows: &B) -> SupabaseResult<()> {
        tracing::debug!(table = %self.table, "insert");
        let resp = self
            .request(Method::POST, false)
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn update<B: Serialize + ?Sized>(self, changes: &B) -> SupabaseResult<()> {
        tracing::debug!(table = %self.table, filters = ?self.filters, "update");
        let resp = self
            .request(Method::PATCH, false)
            .header("Prefer", "return=minimal")
            .json(changes)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn delete(self) -> SupabaseResult<()> {
        tracing::debug!(table = %self.table, filters = ?self.filters, "delete");
        let resp = self
            .request(Method::DELETE, false)
            .header("Prefer", "return=minimal")
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}
