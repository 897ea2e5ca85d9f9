// # Record API Trait
//
// Defines the interface to the remote IP-address record service.
//
// ## Implementations
//
// - HTTP/JSON gateway: `ipboard-api-http` crate
// - Counting mocks: `tests/common` in this crate
//
// ## Responsibility boundaries
//
// Implementations are transport adapters only. They must:
//
// - Perform one request per call: no retry, no backoff (nothing is retried
//   anywhere in this core; see the error-handling design)
// - Never cache pages or records (the `TableStore` owns displayed state)
// - Never interpret rejection codes (field mapping is owned by `RowEditor`)
// - Surface structured rejections as `Error::Rejected` so the codes reach
//   the row editor intact

use async_trait::async_trait;

use crate::model::{RecordPage, RecordPatch};

/// Trait for the remote record service
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait RecordApi: Send + Sync {
    /// Fetch one page of records
    ///
    /// # Parameters
    ///
    /// - `items_per_page`: the shared pagination constant
    /// - `page_number`: zero-based page to request
    ///
    /// # Returns
    ///
    /// - `Ok(RecordPage)`: the page the server served; its `page_number` is
    ///   authoritative and may differ from the requested one
    /// - `Err(Error)`: any failure; the caller treats every fetch failure
    ///   as session invalidation
    async fn fetch_page(
        &self,
        items_per_page: u32,
        page_number: u32,
    ) -> Result<RecordPage, crate::Error>;

    /// Apply a diff-based update to one record
    ///
    /// `patch` carries only changed fields; `None` fields are explicit
    /// "no update" sentinels and must not appear in the request payload.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the server accepted the mutation. The response body is
    ///   deliberately not surfaced: the caller commits its own draft values
    ///   (optimistic local patch)
    /// - `Err(Error::Rejected { .. })`: structured rejection with at least
    ///   one code
    /// - `Err(_)`: transport or protocol failure
    async fn update_record(&self, id: i64, patch: &RecordPatch) -> Result<(), crate::Error>;

    /// Delete one record
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the record is gone server-side
    /// - `Err(Error)`: the failure code is currently not interpreted by
    ///   the caller
    async fn delete_record(&self, id: i64) -> Result<(), crate::Error>;
}
