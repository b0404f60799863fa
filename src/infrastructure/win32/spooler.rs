use super::{last_error, os_error, wide};
use crate::domain::error::Result;
use crate::infrastructure::spooler::Spooler;
use tracing::{debug, warn};
use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Graphics::Printing::{
    ClosePrinter, EndDocPrinter, EndPagePrinter, EnumPrintersW, OpenPrinterW, StartDocPrinterW,
    StartPagePrinter, WritePrinter, DOC_INFO_1W, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL,
    PRINTER_HANDLE, PRINTER_INFO_2W,
};

const PRINTER_INFO_LEVEL: u32 = 2;

/// List local and connected printers.
///
/// The spooler is asked twice: once for the buffer size it needs, then for
/// the data. A zero size means there is nothing to list.
pub fn enumerate_printers() -> Result<Vec<String>> {
    let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
    let mut needed = 0u32;
    let mut returned = 0u32;

    // Expected to fail with ERROR_INSUFFICIENT_BUFFER; only `needed` matters.
    let _ = unsafe {
        EnumPrintersW(
            flags,
            PCWSTR::null(),
            PRINTER_INFO_LEVEL,
            None,
            &mut needed,
            &mut returned,
        )
    };
    if needed == 0 {
        debug!("Spooler reported no printers");
        return Ok(Vec::new());
    }

    // u64 backing keeps the PRINTER_INFO_2W records aligned.
    let mut buffer = vec![0u64; (needed as usize).div_ceil(8)];
    let bytes =
        unsafe { std::slice::from_raw_parts_mut(buffer.as_mut_ptr().cast::<u8>(), needed as usize) };
    unsafe {
        EnumPrintersW(
            flags,
            PCWSTR::null(),
            PRINTER_INFO_LEVEL,
            Some(bytes),
            &mut needed,
            &mut returned,
        )
    }
    .map_err(|e| os_error("EnumPrintersW", e))?;

    let infos = unsafe {
        std::slice::from_raw_parts(buffer.as_ptr().cast::<PRINTER_INFO_2W>(), returned as usize)
    };
    let names = infos
        .iter()
        .map(|info| {
            if info.pPrinterName.is_null() {
                return String::new();
            }
            unsafe { info.pPrinterName.to_string() }.unwrap_or_else(|e| {
                warn!("Printer name is not valid UTF-16: {}", e);
                String::new()
            })
        })
        .collect();
    Ok(names)
}

/// The Win32 print spooler.
pub struct WinSpooler;

impl Spooler for WinSpooler {
    type Handle = PRINTER_HANDLE;

    fn open(&self, printer_name: &str) -> Result<PRINTER_HANDLE> {
        let name = wide(printer_name);
        let mut handle = PRINTER_HANDLE::default();
        unsafe { OpenPrinterW(PCWSTR(name.as_ptr()), &mut handle, None) }
            .map_err(|e| os_error("OpenPrinterW", e))?;
        Ok(handle)
    }

    fn start_doc(&self, handle: PRINTER_HANDLE, document_name: &str) -> Result<()> {
        let mut doc_name = wide(document_name);
        let mut datatype = wide("RAW");
        let info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name.as_mut_ptr()),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype.as_mut_ptr()),
        };
        let job_id = unsafe { StartDocPrinterW(handle, 1, &info) };
        if job_id == 0 {
            return Err(last_error("StartDocPrinterW"));
        }
        debug!("Spooler job {} started", job_id);
        Ok(())
    }

    fn start_page(&self, handle: PRINTER_HANDLE) -> Result<()> {
        if unsafe { StartPagePrinter(handle) }.as_bool() {
            Ok(())
        } else {
            Err(last_error("StartPagePrinter"))
        }
    }

    fn write(&self, handle: PRINTER_HANDLE, payload: &[u8]) -> Result<u32> {
        let mut written = 0u32;
        let ok = unsafe {
            WritePrinter(
                handle,
                payload.as_ptr().cast(),
                payload.len() as u32,
                &mut written,
            )
        };
        if ok.as_bool() {
            Ok(written)
        } else {
            Err(last_error("WritePrinter"))
        }
    }

    fn end_page(&self, handle: PRINTER_HANDLE) -> Result<()> {
        if unsafe { EndPagePrinter(handle) }.as_bool() {
            Ok(())
        } else {
            Err(last_error("EndPagePrinter"))
        }
    }

    fn end_doc(&self, handle: PRINTER_HANDLE) -> Result<()> {
        if unsafe { EndDocPrinter(handle) }.as_bool() {
            Ok(())
        } else {
            Err(last_error("EndDocPrinter"))
        }
    }

    fn close(&self, handle: PRINTER_HANDLE) -> Result<()> {
        unsafe { ClosePrinter(handle) }.map_err(|e| os_error("ClosePrinter", e))
    }
}
