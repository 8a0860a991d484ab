//! Output surfaces for rendered views.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

#[cfg(test)]
use mockall::automock;

use crate::error::DashboardResult;
use crate::types::RenderedView;

/// ANSI clear screen + cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Destination for rendered views.
#[cfg_attr(test, automock)]
pub trait RenderSurface: Send {
    fn present(&mut self, view: &RenderedView) -> DashboardResult<()>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn present(&mut self, view: &RenderedView) -> DashboardResult<()> {
        (**self).present(view)
    }
}

/// Lets several renderers share one surface.
impl<S: RenderSurface> RenderSurface for Arc<Mutex<S>> {
    fn present(&mut self, view: &RenderedView) -> DashboardResult<()> {
        self.lock().present(view)
    }
}

/// Plain-text terminal surface.
///
/// Keeps the latest frame of every view and redraws all of them on each
/// present, so views rendered into one terminal do not overwrite each other.
pub struct TextSurface<W> {
    out: W,
    clear_screen: bool,
    /// View order is the order views were first presented.
    order: Vec<&'static str>,
    frames: BTreeMap<&'static str, String>,
}

impl<W: Write + Send> TextSurface<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self {
            out,
            clear_screen,
            order: Vec::new(),
            frames: BTreeMap::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TextSurface<std::io::Stdout> {
    pub fn stdout(clear_screen: bool) -> Self {
        Self::new(std::io::stdout(), clear_screen)
    }
}

impl<W: Write + Send> RenderSurface for TextSurface<W> {
    fn present(&mut self, view: &RenderedView) -> DashboardResult<()> {
        if !self.frames.contains_key(view.view) {
            self.order.push(view.view);
        }
        self.frames.insert(view.view, view.to_string());

        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        for (i, name) in self.order.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            if let Some(frame) = self.frames.get(name) {
                write!(self.out, "{frame}")?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Writes every rendered view as one JSON line.
pub struct JsonSurface<W> {
    out: W,
}

impl<W: Write + Send> JsonSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RenderSurface for JsonSurface<W> {
    fn present(&mut self, view: &RenderedView) -> DashboardResult<()> {
        serde_json::to_writer(&mut self.out, view)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps every presented view in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    frames: Arc<Mutex<Vec<RenderedView>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<RenderedView> {
        self.frames.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }

    /// Most recent frame of `view`.
    pub fn last_of(&self, view: &str) -> Option<RenderedView> {
        self.frames.lock().iter().rev().find(|f| f.view == view).cloned()
    }
}

impl RenderSurface for RecordingSurface {
    fn present(&mut self, view: &RenderedView) -> DashboardResult<()> {
        self.frames.lock().push(view.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Section, Table};

    fn view(name: &'static str, title: &str) -> RenderedView {
        RenderedView {
            view: name,
            title: title.to_string(),
            stats: vec![],
            sections: vec![Section {
                heading: "Heading".to_string(),
                status: None,
                table: Table::build("t", &["A"], vec![]),
            }],
        }
    }

    #[test]
    fn test_text_surface_clears_and_redraws_all_views() {
        let mut surface = TextSurface::new(Vec::new(), true);
        surface.present(&view("summary", "S1")).unwrap();
        surface.present(&view("modules", "M1")).unwrap();
        surface.present(&view("summary", "S2")).unwrap();

        let out = String::from_utf8(surface.into_inner()).unwrap();
        let last = out.rsplit(CLEAR_SCREEN).next().unwrap();
        assert!(last.starts_with("== S2 =="));
        assert!(last.contains("== M1 =="));
        assert!(!last.contains("S1"));
        assert_eq!(out.matches(CLEAR_SCREEN).count(), 3);
    }

    #[test]
    fn test_text_surface_without_clear() {
        let mut surface = TextSurface::new(Vec::new(), false);
        surface.present(&view("summary", "S1")).unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert!(!out.contains('\x1b'));
        assert!(out.contains("No data available"));
    }

    #[test]
    fn test_json_surface_one_line_per_frame() {
        let mut surface = JsonSurface::new(Vec::new());
        surface.present(&view("summary", "S1")).unwrap();
        surface.present(&view("modules", "M1")).unwrap();

        let out = String::from_utf8(surface.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["view"], "modules");
        assert_eq!(lines[0]["title"], "S1");
    }

    #[test]
    fn test_shared_surface_records_from_clones() {
        let recording = RecordingSurface::new();
        let shared = Arc::new(Mutex::new(recording.clone()));

        let mut a = shared.clone();
        let mut b = shared;
        a.present(&view("summary", "S")).unwrap();
        b.present(&view("modules", "M")).unwrap();

        assert_eq!(recording.len(), 2);
        assert_eq!(recording.last_of("summary").unwrap().title, "S");
    }
}
