//! Text extraction strategies and the fallback selector.
//!
//! A document's text can come from several places: the digital text layer
//! read two different ways, an alternate reader, or OCR of rendered pages.
//! [`ExtractionSelector`] tries them in a fixed order and keeps the first
//! one that produces text for at least one page. Every candidate runs
//! inside its own failure boundary, so a crash in one reader only moves the
//! selector on to the next.

mod alternate;
mod layout;
mod native;
mod ocr;
mod options;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

pub use alternate::AlternateTextStrategy;
pub use layout::{reflow, LayoutTextStrategy};
pub use native::NativeTextStrategy;
pub use ocr::OcrStrategy;
pub use options::{ExtractOptions, LayoutOptions, OcrOptions};

use crate::error::{Error, Result};
use crate::model::{ContentKind, PageText};

/// One way of turning a PDF into per-page text.
pub trait TextStrategy {
    /// Short name recorded in `extraction_methods`.
    fn name(&self) -> &'static str;

    /// Tag applied to the pages this strategy produces.
    fn content_kind(&self) -> ContentKind {
        ContentKind::Text
    }

    /// Extract text for every page of the document at `path`.
    ///
    /// Pages may come back blank; the selector filters them.
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>>;
}

/// What a single candidate produced.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// At least one page has non-blank text
    Success(Vec<PageText>),
    /// The candidate ran but found no text
    Empty,
    /// The candidate failed or panicked
    Failure(Error),
}

impl StrategyOutcome {
    /// Whether this outcome stops the selector.
    pub fn is_success(&self) -> bool {
        matches!(self, StrategyOutcome::Success(_))
    }
}

/// Run `strategy` inside a failure boundary and keep only non-blank pages.
pub fn run_strategy(strategy: &dyn TextStrategy, path: &Path) -> StrategyOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| strategy.extract_pages(path)));

    match result {
        Ok(Ok(pages)) => {
            let pages: Vec<PageText> = pages.into_iter().filter(PageText::has_text).collect();
            if pages.is_empty() {
                StrategyOutcome::Empty
            } else {
                StrategyOutcome::Success(pages)
            }
        }
        Ok(Err(e)) => StrategyOutcome::Failure(e),
        Err(payload) => StrategyOutcome::Failure(Error::TextExtract(format!(
            "{} panicked: {}",
            strategy.name(),
            panic_message(payload.as_ref())
        ))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// The winning candidate and its pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Name of the strategy that produced the pages
    pub strategy: &'static str,
    /// Tag carried by every page
    pub kind: ContentKind,
    /// Pages with non-blank text, in page order
    pub pages: Vec<PageText>,
}

/// Tries text strategies in priority order.
pub struct ExtractionSelector {
    strategies: Vec<Box<dyn TextStrategy>>,
}

impl ExtractionSelector {
    /// Build the standard candidate list: text layer, layout-aware text
    /// layer, alternate reader, then OCR unless disabled.
    pub fn from_options(options: &ExtractOptions) -> Self {
        let mut strategies: Vec<Box<dyn TextStrategy>> = vec![
            Box::new(NativeTextStrategy::new()),
            Box::new(LayoutTextStrategy::new(options.layout)),
            Box::new(AlternateTextStrategy::new()),
        ];
        if options.ocr.enabled {
            strategies.push(Box::new(OcrStrategy::new(options.ocr.clone())));
        }
        Self { strategies }
    }

    /// Use an explicit candidate list.
    pub fn with_strategies(strategies: Vec<Box<dyn TextStrategy>>) -> Self {
        Self { strategies }
    }

    /// Candidate names in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run candidates until one yields text.
    ///
    /// Returns `None` when every candidate was empty or failed; that is a
    /// valid outcome, not an error.
    pub fn select(&self, path: &Path) -> Option<Selection> {
        for strategy in &self.strategies {
            log::debug!("Trying text strategy '{}'", strategy.name());

            match run_strategy(strategy.as_ref(), path) {
                StrategyOutcome::Success(pages) => {
                    log::info!(
                        "Extracted {} page(s) with '{}'",
                        pages.len(),
                        strategy.name()
                    );
                    let kind = strategy.content_kind();
                    let pages = pages
                        .into_iter()
                        .map(|page| PageText { kind, ..page })
                        .collect();
                    return Some(Selection {
                        strategy: strategy.name(),
                        kind,
                        pages,
                    });
                }
                StrategyOutcome::Empty => {
                    log::debug!("Strategy '{}' found no text", strategy.name());
                }
                StrategyOutcome::Failure(e) => {
                    log::warn!("Strategy '{}' failed: {}", strategy.name(), e);
                }
            }
        }

        log::warn!("No strategy produced text");
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Scripted strategy that records how often it ran.
    pub(crate) struct Scripted {
        pub name: &'static str,
        pub kind: ContentKind,
        pub behavior: Behavior,
        pub calls: Rc<Cell<usize>>,
    }

    #[derive(Clone)]
    pub(crate) enum Behavior {
        Pages(Vec<&'static str>),
        Fail,
        Panic,
    }

    impl Scripted {
        pub fn new(name: &'static str, behavior: Behavior) -> Self {
            Self {
                name,
                kind: ContentKind::Text,
                behavior,
                calls: Rc::new(Cell::new(0)),
            }
        }

        pub fn ocr(mut self) -> Self {
            self.kind = ContentKind::Ocr;
            self
        }
    }

    impl TextStrategy for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn content_kind(&self) -> ContentKind {
            self.kind
        }

        fn extract_pages(&self, _path: &Path) -> Result<Vec<PageText>> {
            self.calls.set(self.calls.get() + 1);
            match &self.behavior {
                Behavior::Pages(pages) => Ok(pages
                    .iter()
                    .enumerate()
                    .map(|(i, text)| PageText::text(i as u32 + 1, *text))
                    .collect()),
                Behavior::Fail => Err(Error::TextExtract("scripted failure".to_string())),
                Behavior::Panic => panic!("scripted panic"),
            }
        }
    }

    fn path() -> &'static Path {
        Path::new("unused.pdf")
    }

    #[test]
    fn test_first_success_short_circuits() {
        let first = Scripted::new("first", Behavior::Pages(vec!["hello"]));
        let second = Scripted::new("second", Behavior::Pages(vec!["other"]));
        let second_calls = second.calls.clone();

        let selector = ExtractionSelector::with_strategies(vec![Box::new(first), Box::new(second)]);
        let selection = selector.select(path()).unwrap();

        assert_eq!(selection.strategy, "first");
        assert_eq!(selection.pages.len(), 1);
        assert_eq!(second_calls.get(), 0);
    }

    #[test]
    fn test_blank_pages_advance_selector() {
        let blank = Scripted::new("blank", Behavior::Pages(vec!["  ", "\n\n"]));
        let real = Scripted::new("real", Behavior::Pages(vec!["", "page two"]));

        let selector = ExtractionSelector::with_strategies(vec![Box::new(blank), Box::new(real)]);
        let selection = selector.select(path()).unwrap();

        assert_eq!(selection.strategy, "real");
        assert_eq!(selection.pages, vec![PageText::text(2, "page two")]);
    }

    #[test]
    fn test_failure_and_panic_are_contained() {
        let failing = Scripted::new("failing", Behavior::Fail);
        let panicking = Scripted::new("panicking", Behavior::Panic);
        let ocr = Scripted::new("ocr", Behavior::Pages(vec!["scanned words"])).ocr();

        let selector = ExtractionSelector::with_strategies(vec![
            Box::new(failing),
            Box::new(panicking),
            Box::new(ocr),
        ]);
        let selection = selector.select(path()).unwrap();

        assert_eq!(selection.strategy, "ocr");
        assert_eq!(selection.kind, ContentKind::Ocr);
        assert!(selection.pages.iter().all(|p| p.kind == ContentKind::Ocr));
    }

    #[test]
    fn test_nothing_selected() {
        let selector = ExtractionSelector::with_strategies(vec![
            Box::new(Scripted::new("a", Behavior::Pages(vec![]))),
            Box::new(Scripted::new("b", Behavior::Fail)),
        ]);
        assert!(selector.select(path()).is_none());
    }

    #[test]
    fn test_run_strategy_reports_panic() {
        let outcome = run_strategy(&Scripted::new("boom", Behavior::Panic), path());
        match outcome {
            StrategyOutcome::Failure(e) => assert!(e.to_string().contains("boom panicked")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_standard_order() {
        let selector = ExtractionSelector::from_options(&ExtractOptions::default());
        assert_eq!(
            selector.strategy_names(),
            vec!["lopdf", "layout", "pdf-extract", "tesseract"]
        );

        let selector = ExtractionSelector::from_options(&ExtractOptions::new().without_ocr());
        assert_eq!(selector.strategy_names(), vec!["lopdf", "layout", "pdf-extract"]);
    }
}
