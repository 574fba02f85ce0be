use std::collections::BTreeMap;

use chrono::NaiveDate;
use pensionkit_io_xlsx::convert_dataframe_to_ipc_bytes;
use pensionkit_review::{
    EnumReviewMode, EnumReviewOutcome, ReportReview, SpecDownload, SpecReviewRequest,
    process_upload,
};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "pensionkit.review.process_upload.v1";
const C_BRIDGE_TRANSPORT: &str = "arrow_ipc";

#[pyclass(name = "Download")]
#[derive(Debug, Clone)]
struct PyDownload {
    #[pyo3(get)]
    label: String,
    #[pyo3(get)]
    file_name: String,
    #[pyo3(get)]
    sheet_name: String,
    #[pyo3(get)]
    mime_type: String,
    bytes: Vec<u8>,
}

impl From<SpecDownload> for PyDownload {
    fn from(download: SpecDownload) -> Self {
        Self {
            label: download.label,
            file_name: download.file_name,
            sheet_name: download.sheet_name,
            mime_type: download.mime_type,
            bytes: download.bytes,
        }
    }
}

#[pymethods]
impl PyDownload {
    #[getter]
    fn data<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new(py, &self.bytes)
    }

    fn __repr__(&self) -> String {
        format!(
            "Download(file_name={:?}, sheet_name={:?}, size={})",
            self.file_name,
            self.sheet_name,
            self.bytes.len()
        )
    }
}

#[pyclass(name = "ReviewOutcome")]
#[derive(Debug, Clone)]
struct PyReviewOutcome {
    #[pyo3(get)]
    ok: bool,
    #[pyo3(get)]
    message: Option<String>,
    #[pyo3(get)]
    mode: String,
    #[pyo3(get)]
    date_today: Option<String>,
    #[pyo3(get)]
    caption_filtered: Option<String>,
    #[pyo3(get)]
    downloads: Vec<PyDownload>,
    #[pyo3(get)]
    counts: BTreeMap<String, usize>,
    table: Option<Vec<u8>>,
    table_filtered: Option<Vec<u8>>,
}

impl PyReviewOutcome {
    fn from_failure(mode: EnumReviewMode, message: String) -> Self {
        Self {
            ok: false,
            message: Some(message),
            mode: mode.as_label().to_string(),
            date_today: None,
            caption_filtered: None,
            downloads: Vec::new(),
            counts: BTreeMap::new(),
            table: None,
            table_filtered: None,
        }
    }

    fn try_from_report(report: ReportReview) -> PyResult<Self> {
        let table = convert_dataframe_to_ipc_bytes(&report.df_classified)
            .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;
        let table_filtered = report
            .df_filtered
            .as_ref()
            .map(convert_dataframe_to_ipc_bytes)
            .transpose()
            .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;

        Ok(Self {
            ok: true,
            message: None,
            mode: report.mode.as_label().to_string(),
            date_today: Some(report.date_today.format("%Y-%m-%d").to_string()),
            caption_filtered: report.caption_filtered(),
            counts: report.report_classify.to_dict(),
            downloads: report.downloads.into_iter().map(PyDownload::from).collect(),
            table: Some(table),
            table_filtered,
        })
    }
}

#[pymethods]
impl PyReviewOutcome {
    /// Classified table as Arrow IPC bytes (`polars.read_ipc`).
    #[getter]
    fn table_ipc<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyBytes>> {
        self.table.as_deref().map(|v_bytes| PyBytes::new(py, v_bytes))
    }

    /// Filtered table as Arrow IPC bytes, when the filter ran.
    #[getter]
    fn table_filtered_ipc<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyBytes>> {
        self.table_filtered
            .as_deref()
            .map(|v_bytes| PyBytes::new(py, v_bytes))
    }

    fn __repr__(&self) -> String {
        match &self.message {
            Some(message) => format!("ReviewOutcome(ok=False, message={message:?})"),
            None => format!(
                "ReviewOutcome(ok=True, mode={:?}, downloads={})",
                self.mode,
                self.downloads.len()
            ),
        }
    }
}

fn parse_review_mode(value: &str) -> PyResult<EnumReviewMode> {
    if let Some(mode) = EnumReviewMode::from_label(value) {
        return Ok(mode);
    }
    match value {
        "alert" => Ok(EnumReviewMode::AlertNotification),
        "button" => Ok(EnumReviewMode::ButtonNotification),
        _ => Err(PyValueError::new_err(format!(
            "Invalid review mode: `{value}`. Expected one of: ['{}', '{}', 'alert', 'button']",
            EnumReviewMode::AlertNotification.as_label(),
            EnumReviewMode::ButtonNotification.as_label()
        ))),
    }
}

fn parse_date_today(value: Option<&str>) -> PyResult<Option<NaiveDate>> {
    value
        .map(|c_date| {
            NaiveDate::parse_from_str(c_date.trim(), "%Y-%m-%d").map_err(|err| {
                PyValueError::new_err(format!(
                    "Invalid date_today: `{c_date}`. Expected YYYY-MM-DD ({err})"
                ))
            })
        })
        .transpose()
}

#[pyfunction(name = "process_upload")]
#[pyo3(signature = (data, mode, days_filter = None, date_today = None))]
fn process_upload_py(
    py: Python<'_>,
    data: &[u8],
    mode: &str,
    days_filter: Option<u32>,
    date_today: Option<&str>,
) -> PyResult<PyReviewOutcome> {
    let request = SpecReviewRequest {
        mode: parse_review_mode(mode)?,
        days_filter,
        date_today: parse_date_today(date_today)?,
    };

    let outcome = py.allow_threads(|| process_upload(data, &request));
    match outcome {
        EnumReviewOutcome::Completed(report) => PyReviewOutcome::try_from_report(*report),
        EnumReviewOutcome::Failed { message } => {
            Ok(PyReviewOutcome::from_failure(request.mode, message))
        }
    }
}

/// Install a stderr tracing subscriber; returns `False` if one is already set.
#[pyfunction]
#[pyo3(signature = (level = "info"))]
fn init_logging(level: &str) -> PyResult<bool> {
    let filter = EnvFilter::try_new(level).map_err(|err| {
        PyValueError::new_err(format!("Invalid log filter: `{level}` ({err})"))
    })?;

    Ok(tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(filter)
        .try_init()
        .is_ok())
}

#[pymodule]
fn _pensionkit_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyDownload>()?;
    module.add_class::<PyReviewOutcome>()?;
    module.add_function(wrap_pyfunction!(process_upload_py, module)?)?;
    module.add_function(wrap_pyfunction!(init_logging, module)?)?;
    module.add(
        "REVIEW_MODES",
        vec![
            EnumReviewMode::AlertNotification.as_label(),
            EnumReviewMode::ButtonNotification.as_label(),
        ],
    )?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
