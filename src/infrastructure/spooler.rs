//! Raw Print Sequencing
//!
//! Drives a spooler through open, start-doc, start-page, write, end-page,
//! end-doc and close. Each acquired stage is held by a guard, so whatever
//! step fails, everything opened before it is released in reverse order.

use crate::domain::error::{BridgeError, Result};
use crate::domain::models::PrintJob;
use tracing::{debug, warn};

/// The primitive calls of a print spooler.
pub trait Spooler {
    type Handle: Copy;

    fn open(&self, printer_name: &str) -> Result<Self::Handle>;
    fn start_doc(&self, handle: Self::Handle, document_name: &str) -> Result<()>;
    fn start_page(&self, handle: Self::Handle) -> Result<()>;
    /// Returns the number of bytes the spooler accepted.
    fn write(&self, handle: Self::Handle, payload: &[u8]) -> Result<u32>;
    fn end_page(&self, handle: Self::Handle) -> Result<()>;
    fn end_doc(&self, handle: Self::Handle) -> Result<()>;
    fn close(&self, handle: Self::Handle) -> Result<()>;
}

struct PrinterGuard<'a, S: Spooler> {
    spooler: &'a S,
    handle: S::Handle,
}

impl<S: Spooler> Drop for PrinterGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.spooler.close(self.handle) {
            warn!("Failed to close printer: {}", e);
        }
    }
}

struct DocGuard<'a, S: Spooler> {
    spooler: &'a S,
    handle: S::Handle,
}

impl<S: Spooler> Drop for DocGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.spooler.end_doc(self.handle) {
            warn!("Failed to end document: {}", e);
        }
    }
}

struct PageGuard<'a, S: Spooler> {
    spooler: &'a S,
    handle: S::Handle,
}

impl<S: Spooler> Drop for PageGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.spooler.end_page(self.handle) {
            warn!("Failed to end page: {}", e);
        }
    }
}

/// Submit `job` as a single one-page raw document.
pub fn submit_raw_job<S: Spooler>(spooler: &S, job: &PrintJob, document_name: &str) -> Result<()> {
    let handle = spooler.open(&job.printer_name)?;
    let printer = PrinterGuard { spooler, handle };

    spooler.start_doc(printer.handle, document_name)?;
    let doc = DocGuard { spooler, handle };

    spooler.start_page(doc.handle)?;
    let page = PageGuard { spooler, handle };

    let written = spooler.write(page.handle, &job.payload)?;
    debug!(
        "Wrote {} of {} bytes to {}",
        written,
        job.payload.len(),
        job.printer_name
    );
    if written as usize != job.payload.len() {
        return Err(BridgeError::ShortWrite {
            written,
            expected: job.payload.len(),
        });
    }

    // Guards drop in reverse declaration order: page, doc, printer.
    drop(page);
    drop(doc);
    drop(printer);
    Ok(())
}
