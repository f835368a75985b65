//! Lazy traversal of the exchange's paginated list endpoints.
//!
//! List endpoints return one page per call and put the cursor for the next
//! (older) page in the `cb-after` response header. A [`Paginator`] requests a
//! page only when the previous one has been consumed. With a [`DateFloor`] it
//! also stops at the first page that has nothing at or after the floor.

use std::collections::VecDeque;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use futures::Stream;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::net::{after_cursor, get_json};
use crate::core::{Auth, CbpClient, CbpError, parse_instant};

/// Keep only records whose `field` is at or after `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFloor {
    pub field: String,
    pub start: DateTime<Utc>,
}

impl DateFloor {
    pub fn new(field: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            field: field.into(),
            start,
        }
    }

    /// Whether `record` passes the floor.
    ///
    /// # Errors
    /// [`CbpError::Data`] if the field is missing, not a string, or not a date.
    pub fn admits(&self, record: &Value) -> Result<bool, CbpError> {
        let raw = record
            .get(&self.field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CbpError::Data(format!("record has no string field {:?}", self.field))
            })?;
        Ok(parse_instant(raw)? >= self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    First,
    After(String),
    Exhausted,
}

/// Forward-only, non-restartable sequence of `T` from a paginated endpoint.
///
/// Created by [`CbpClient::paginate`]. Only the current page is buffered and
/// only one request is ever in flight. After exhaustion or an error every
/// further pull returns `Ok(None)`.
#[derive(Debug)]
pub struct Paginator<T> {
    client: CbpClient,
    endpoint: String,
    params: Vec<(String, String)>,
    auth: Auth,
    floor: Option<DateFloor>,
    cursor: Cursor,
    page: VecDeque<T>,
    pages_fetched: usize,
    _record: PhantomData<fn() -> T>,
}

impl CbpClient {
    /// Iterate over every record of a list endpoint.
    ///
    /// `endpoint` is relative to the base URL (e.g. `"orders"`), `params` are sent
    /// with every page. Without a `floor` pagination follows the cursor until the
    /// exchange stops returning one or returns an empty page.
    pub fn paginate<T: DeserializeOwned>(
        &self,
        endpoint: impl Into<String>,
        params: Vec<(String, String)>,
        auth: Auth,
        floor: Option<DateFloor>,
    ) -> Paginator<T> {
        Paginator {
            client: self.clone(),
            endpoint: endpoint.into(),
            params,
            auth,
            floor,
            cursor: Cursor::First,
            page: VecDeque::new(),
            pages_fetched: 0,
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Paginator<T> {
    /// Pull the next record, fetching the next page when the current one is used up.
    ///
    /// # Errors
    /// Transport failures, undecodable pages, and records with a malformed date
    /// field in date-floor mode. The paginator is finished afterwards.
    pub async fn next(&mut self) -> Result<Option<T>, CbpError> {
        loop {
            if let Some(record) = self.page.pop_front() {
                return Ok(Some(record));
            }
            let after = match &self.cursor {
                Cursor::Exhausted => return Ok(None),
                Cursor::First => None,
                Cursor::After(token) => Some(token.clone()),
            };

            if self.pages_fetched > 0 {
                self.client.pace().await;
            }
            if let Err(e) = self.fetch_page(after).await {
                self.cursor = Cursor::Exhausted;
                self.page.clear();
                return Err(e);
            }
        }
    }

    /// Number of page requests issued so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Collect the remaining records.
    pub async fn collect_all(mut self) -> Result<Vec<T>, CbpError> {
        let mut out = Vec::new();
        while let Some(r) = self.next().await? {
            out.push(r);
        }
        Ok(out)
    }

    /// Adapt into a [`futures::Stream`]; the stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<T, CbpError>> {
        futures::stream::try_unfold(self, |mut p| async move {
            Ok(p.next().await?.map(|r| (r, p)))
        })
    }

    async fn fetch_page(&mut self, after: Option<String>) -> Result<(), CbpError> {
        let mut query = self.params.clone();
        if let Some(token) = after {
            query.push(("after".to_string(), token));
        }

        let resp = self
            .client
            .send(Method::GET, &self.endpoint, &query, None, self.auth)
            .await?;
        let next_cursor = after_cursor(&resp);
        let records: Vec<Value> = get_json(resp, &self.endpoint).await?;
        self.pages_fetched += 1;

        let received = records.len();
        let mut kept = Vec::with_capacity(received);
        for record in records {
            if let Some(floor) = &self.floor {
                if !floor.admits(&record)? {
                    continue;
                }
            }
            let decoded = serde_json::from_value(record).map_err(|e| {
                CbpError::Data(format!("{}: record decode error: {e}", self.endpoint))
            })?;
            kept.push(decoded);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            endpoint = %self.endpoint,
            page = self.pages_fetched,
            received,
            kept = kept.len(),
            has_next = next_cursor.is_some(),
            "fetched page"
        );

        self.cursor = match next_cursor {
            Some(token) if received > 0 && !kept.is_empty() => Cursor::After(token),
            _ => Cursor::Exhausted,
        };
        self.page.extend(kept);
        Ok(())
    }
}
