//! Text metrics negotiated with the LaTeX compiler.
//!
//! The size of typeset text is only known once LaTeX has typeset it. Each run
//! records the texts it needed to measure; the markup it emits makes LaTeX
//! write their sizes to a side-channel file, which the next run reads back.
//! Until then every lookup answers a default value and a single
//! [`Warning::MissingTextMetric`] is raised, so a first run always succeeds
//! and a second run converges.
//!
//! Records look like `<id>:<value>pt-`. Identifiers are content addressed
//! (a blake3 prefix of the text plus a letter for the measured dimension),
//! so the cache stays valid across runs as long as the text is unchanged.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pest::Parser;
use pest_derive::Parser;

use crate::errors::{MetricsError, Warning};
use crate::render::MarkupFragment;
use crate::render::defaults;

#[derive(Parser)]
#[grammar = "auxfile.pest"]
struct AuxFileParser;

/// Centimetres per TeX point.
const CM_PER_PT: f64 = 2.54 / 72.27;

/// Hex digits of the blake3 hash kept in an identifier.
const ID_HASH_LEN: usize = 16;

/// Which dimension of a text box is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    Width,
    Height,
    Depth,
}

impl MetricKind {
    fn letter(self) -> char {
        match self {
            MetricKind::Width => 'W',
            MetricKind::Height => 'H',
            MetricKind::Depth => 'D',
        }
    }

    /// `calc` macro computing this dimension.
    fn calc_macro(self) -> &'static str {
        match self {
            MetricKind::Width => "\\widthof",
            MetricKind::Height => "\\heightof",
            MetricKind::Depth => "\\depthof",
        }
    }

    /// TeX box dimension primitive.
    fn box_dimension(self) -> &'static str {
        match self {
            MetricKind::Width => "\\wd",
            MetricKind::Height => "\\ht",
            MetricKind::Depth => "\\dp",
        }
    }
}

/// Identifier of the record holding `kind` of `text`.
pub fn metric_id(text: &str, kind: MetricKind) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[kind.letter() as u8, 0]);
    hasher.update(text.as_bytes());
    let hex = hasher.finalize().to_hex();
    format!("{}{}", &hex[..ID_HASH_LEN], kind.letter())
}

/// The two side-channel files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuxFiles {
    /// Request records written by this library.
    pub write_path: PathBuf,
    /// Measurements written by LaTeX and read back on the next run.
    pub read_path: PathBuf,
}

impl AuxFiles {
    pub fn new(write_path: impl Into<PathBuf>, read_path: impl Into<PathBuf>) -> Self {
        AuxFiles {
            write_path: write_path.into(),
            read_path: read_path.into(),
        }
    }

    /// `<stem>.psgeom.req` and `<stem>.psgeom.aux` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, stem: &str) -> Self {
        let dir = dir.as_ref();
        AuxFiles::new(
            dir.join(format!("{stem}.psgeom.req")),
            dir.join(format!("{stem}.psgeom.aux")),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
struct MetricRequest {
    text: String,
    kind: MetricKind,
}

/// Cache of text measurements plus the requests of the current run.
#[derive(Debug)]
pub struct TextMetrics {
    files: Option<AuxFiles>,
    /// Known values in points, keyed by identifier.
    known: BTreeMap<String, f64>,
    requests: RefCell<BTreeMap<String, MetricRequest>>,
    warned: Cell<bool>,
    pending: RefCell<Vec<Warning>>,
    default_value: f64,
}

impl TextMetrics {
    /// A cache that never touches the filesystem.
    pub fn in_memory() -> Self {
        TextMetrics {
            files: None,
            known: BTreeMap::new(),
            requests: RefCell::new(BTreeMap::new()),
            warned: Cell::new(false),
            pending: RefCell::new(Vec::new()),
            default_value: defaults::TEXT_METRIC,
        }
    }

    /// A cache backed by `files`, loaded from `files.read_path`.
    ///
    /// A missing read file is the normal state of a first run.
    pub fn from_files(files: AuxFiles) -> Result<Self, MetricsError> {
        let mut metrics = TextMetrics {
            files: Some(files),
            ..TextMetrics::in_memory()
        };
        metrics.load()?;
        Ok(metrics)
    }

    /// Value (in cm) answered for unknown texts.
    pub fn with_default(mut self, cm: f64) -> Self {
        self.default_value = cm;
        self
    }

    pub fn files(&self) -> Option<&AuxFiles> {
        self.files.as_ref()
    }

    /// Record a measurement directly, in centimetres.
    pub fn insert(&mut self, text: &str, kind: MetricKind, cm: f64) {
        self.known.insert(metric_id(text, kind), cm / CM_PER_PT);
    }

    /// (Re)load the read file, then rewrite it compacted: one record per
    /// identifier, sorted.
    pub fn load(&mut self) -> Result<(), MetricsError> {
        let Some(files) = &self.files else {
            return Ok(());
        };
        let path = &files.read_path;
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                crate::log::debug!(path = %path.display(), "no text metrics yet");
                return Ok(());
            }
            Err(source) => {
                return Err(MetricsError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        for (id, pt) in parse_records(&content, path)? {
            self.known.insert(id, pt);
        }
        crate::log::debug!(path = %path.display(), count = self.known.len(), "loaded text metrics");

        let compacted: String = self.known.iter().map(|(id, pt)| format!("{id}:{pt}pt-\n")).collect();
        write_file(path, &compacted)
    }

    /// Size of `text` along `kind`, in centimetres.
    ///
    /// The request is recorded either way. An unknown text answers the
    /// default value; the first miss of this instance raises a warning.
    pub fn measure(&self, text: &str, kind: MetricKind) -> f64 {
        let id = metric_id(text, kind);
        let known = self.known.get(&id).copied();
        self.requests.borrow_mut().insert(
            id.clone(),
            MetricRequest {
                text: text.to_string(),
                kind,
            },
        );
        match known {
            Some(pt) => pt * CM_PER_PT,
            None => {
                if !self.warned.replace(true) {
                    let warning = Warning::MissingTextMetric { id };
                    crate::log::report(&warning);
                    self.pending.borrow_mut().push(warning);
                }
                self.default_value
            }
        }
    }

    pub fn is_known(&self, text: &str, kind: MetricKind) -> bool {
        self.known.contains_key(&metric_id(text, kind))
    }

    /// Identifiers requested so far, sorted.
    pub fn requested_ids(&self) -> Vec<String> {
        self.requests.borrow().keys().cloned().collect()
    }

    /// Warnings raised since the last call.
    pub fn take_warnings(&self) -> Vec<Warning> {
        self.pending.take()
    }

    /// LaTeX code that measures every requested text and writes the results
    /// to the read file. `None` without files or without requests.
    pub fn requests_markup(&self) -> Option<MarkupFragment> {
        let files = self.files.as_ref()?;
        let requests = self.requests.borrow();
        if requests.is_empty() {
            return None;
        }
        let mut lines = vec![
            "\\ifdefined\\psgeomBox\\else\\newbox\\psgeomBox\\newwrite\\psgeomWrite\\fi".to_string(),
            format!("\\immediate\\openout\\psgeomWrite={}", tex_path(&files.read_path)),
        ];
        for (id, request) in requests.iter() {
            lines.push(format!(
                "\\setbox\\psgeomBox=\\hbox{{{}}}\\immediate\\write\\psgeomWrite{{{id}:\\the{}\\psgeomBox-}}",
                request.text,
                request.kind.box_dimension()
            ));
        }
        lines.push("\\immediate\\closeout\\psgeomWrite".to_string());
        Some(lines.join("\n"))
    }

    /// Write the request records `<id>:\widthof{text}-` to the write file.
    pub fn write_requests(&self) -> Result<(), MetricsError> {
        let Some(files) = &self.files else {
            return Ok(());
        };
        let content: String = self
            .requests
            .borrow()
            .iter()
            .map(|(id, r)| format!("{id}:{}{{{}}}-\n", r.kind.calc_macro(), r.text))
            .collect();
        write_file(&files.write_path, &content)
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        TextMetrics::in_memory()
    }
}

/// Parse the read file into `(id, points)` pairs, in file order.
fn parse_records(input: &str, path: &Path) -> Result<Vec<(String, f64)>, MetricsError> {
    let parse_error = |message: String| MetricsError::Parse {
        path: path.display().to_string(),
        message,
    };
    let file = AuxFileParser::parse(Rule::file, input)
        .map_err(|e| parse_error(e.to_string()))?
        .next()
        .ok_or_else(|| parse_error("empty parse".to_string()))?;

    let mut records = Vec::new();
    for record in file.into_inner() {
        if record.as_rule() != Rule::record {
            continue;
        }
        let mut id = None;
        let mut value = None;
        for part in record.into_inner() {
            match part.as_rule() {
                Rule::ident => id = Some(part.as_str().to_string()),
                Rule::number => {
                    let n = part
                        .as_str()
                        .parse::<f64>()
                        .map_err(|e| parse_error(format!("{}: {e}", part.as_str())))?;
                    value = Some(n);
                }
                _ => {}
            }
        }
        if let (Some(id), Some(value)) = (id, value) {
            records.push((id, value));
        }
    }
    Ok(records)
}

fn write_file(path: &Path, content: &str) -> Result<(), MetricsError> {
    fs::write(path, content).map_err(|source| MetricsError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// TeX wants forward slashes.
fn tex_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_content_addressed() {
        let a = metric_id("Hello", MetricKind::Width);
        assert_eq!(a, metric_id("Hello", MetricKind::Width));
        assert_ne!(a, metric_id("Hello", MetricKind::Height));
        assert_ne!(a, metric_id("Hello!", MetricKind::Width));
        assert_eq!(a.len(), ID_HASH_LEN + 1);
        assert!(a.ends_with('W'));
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn parse_records_keeps_points() {
        let records = parse_records("abcW:12.5pt-\n  defH:3pt-x_1D:-0.25-", Path::new("t")).unwrap();
        assert_eq!(
            records,
            vec![
                ("abcW".to_string(), 12.5),
                ("defH".to_string(), 3.0),
                ("x_1D".to_string(), -0.25),
            ]
        );
    }

    #[test]
    fn parse_records_rejects_garbage() {
        let err = parse_records("abcW:twelve-", Path::new("bad.aux")).unwrap_err();
        assert!(matches!(err, MetricsError::Parse { ref path, .. } if path == "bad.aux"));
    }

    #[test]
    fn empty_file_has_no_records() {
        assert!(parse_records("", Path::new("t")).unwrap().is_empty());
        assert!(parse_records("\n\n", Path::new("t")).unwrap().is_empty());
    }

    #[test]
    fn unknown_text_answers_default_and_warns_once() {
        let metrics = TextMetrics::in_memory().with_default(0.5);
        assert_eq!(metrics.measure("A", MetricKind::Width), 0.5);
        assert_eq!(metrics.measure("B", MetricKind::Height), 0.5);
        let warnings = metrics.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Warning::MissingTextMetric { .. }));
        assert_eq!(metrics.requested_ids().len(), 2);
    }

    #[test]
    fn inserted_values_are_centimetres() {
        let mut metrics = TextMetrics::in_memory();
        metrics.insert("A", MetricKind::Width, 1.25);
        assert!((metrics.measure("A", MetricKind::Width) - 1.25).abs() < 1e-12);
        assert!(metrics.take_warnings().is_empty());
    }

    #[test]
    fn in_memory_emits_no_markup() {
        let metrics = TextMetrics::in_memory();
        metrics.measure("A", MetricKind::Width);
        assert_eq!(metrics.requests_markup(), None);
        assert!(metrics.write_requests().is_ok());
    }
}
