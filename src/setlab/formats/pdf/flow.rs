//! Page flow for paged reports
//!
//! Text blocks are laid out top to bottom. When a block runs past the bottom margin it
//! continues on a fresh page under a `<heading> (continued)` line. Positions are in
//! PostScript points with the origin at the bottom-left corner.

use crate::setlab::settings::PageSize;

/// Millimetres to points
pub const MM: f64 = 72.0 / 25.4;

const TITLE_SIZE: f64 = 16.0;
const HEADING_SIZE: f64 = 12.0;
const BODY_SIZE: f64 = 10.0;
const TITLE_STEP: f64 = 25.0;
const HEADING_STEP: f64 = 15.0;
const LINE_STEP: f64 = 12.0;
const BLOCK_GAP: f64 = 10.0;
/// Courier advance width per point of font size
const MONO_ADVANCE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
    Mono,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Mono];

    /// Name of the font in page resources
    pub fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Mono => "F3",
        }
    }

    /// Standard Type1 font used for this face
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Mono => "Courier",
        }
    }
}

/// One line of text placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub font: Font,
    pub size: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Baseline of the first line on a page
    pub top: f64,
    /// No line is started below this baseline
    pub bottom: f64,
}

impl PageGeometry {
    pub fn new(size: PageSize) -> Self {
        let (width, height) = size.dimensions();
        PageGeometry {
            width,
            height,
            margin: 20.0 * MM,
            top: height - 25.0 * MM,
            bottom: 25.0 * MM,
        }
    }

    /// Characters of body text that fit between the margins
    pub fn body_columns(&self) -> usize {
        let usable = self.width - 2.0 * self.margin;
        ((usable / (BODY_SIZE * MONO_ADVANCE)).floor() as usize).max(1)
    }
}

/// Lays out titled text blocks across as many pages as needed
#[derive(Debug, Clone)]
pub struct PageFlow {
    geometry: PageGeometry,
    finished: Vec<Page>,
    current: Page,
    y: f64,
}

impl PageFlow {
    pub fn new(geometry: PageGeometry) -> Self {
        PageFlow {
            geometry,
            finished: Vec::new(),
            current: Page::default(),
            y: geometry.top,
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn put(&mut self, font: Font, size: f64, text: &str) {
        if text.is_empty() {
            return;
        }
        self.current.runs.push(TextRun {
            x: self.geometry.margin,
            y: self.y,
            font,
            size,
            text: text.to_string(),
        });
    }

    /// Document title at the current position
    pub fn title(&mut self, text: &str) {
        self.put(Font::Bold, TITLE_SIZE, text);
        self.y -= TITLE_STEP;
    }

    /// A bold heading followed by monospaced body lines
    pub fn block(&mut self, heading: &str, body: &str) {
        if self.y - HEADING_STEP < self.geometry.bottom {
            self.page_break();
        }
        self.put(Font::Bold, HEADING_SIZE, heading);
        self.y -= HEADING_STEP;

        let columns = self.geometry.body_columns();
        for line in body.lines() {
            for piece in wrap(line, columns) {
                if self.y < self.geometry.bottom {
                    self.page_break();
                    self.put(Font::Bold, HEADING_SIZE, &format!("{heading} (continued)"));
                    self.y -= HEADING_STEP;
                }
                self.put(Font::Mono, BODY_SIZE, &piece);
                self.y -= LINE_STEP;
            }
        }
        self.y -= BLOCK_GAP;
    }

    /// Start a new page
    pub fn page_break(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.y = self.geometry.top;
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    pub fn finish(mut self) -> Vec<Page> {
        self.finished.push(self.current);
        self.finished
    }
}

/// Greedy word wrap; continuation lines are indented and overlong words are split
fn wrap(line: &str, width: usize) -> Vec<String> {
    const INDENT: &str = "    ";
    let width = width.max(INDENT.len() + 1);
    let mut pieces = Vec::new();
    let mut rest = line.trim_end().to_string();
    let mut prefix = "";
    loop {
        let chars: Vec<char> = rest.chars().collect();
        let room = width - prefix.len();
        if chars.len() <= room {
            pieces.push(format!("{prefix}{rest}"));
            break;
        }
        let split = chars[..=room]
            .iter()
            .rposition(|ch| *ch == ' ')
            .filter(|index| *index > 0)
            .unwrap_or(room);
        let head: String = chars[..split].iter().collect();
        pieces.push(format!("{prefix}{}", head.trim_end()));
        rest = chars[split..]
            .iter()
            .collect::<String>()
            .trim_start()
            .to_string();
        prefix = INDENT;
        if rest.is_empty() {
            break;
        }
    }
    pieces
}
