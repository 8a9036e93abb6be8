//! Venn diagram model and terminal surface
//!
//! A [`Diagram`] is derived from a computation: set outlines from [`layout`], one text per
//! region, and the active flag as emphasis. [`VennCanvas`] draws it with a ratatui canvas
//! into an offscreen [`Buffer`], which can then be printed as plain text or with colours.
//!
//! [`layout`]: crate::setlab::layout

use crate::setlab::computation::Computation;
use crate::setlab::elements::display_order;
use crate::setlab::layout::{self, Circle, Point};
use crate::setlab::region::RegionMask;
use crate::setlab::sets::Label;
use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Circle as CircleShape};
use ratatui::widgets::{Block, Widget};
use std::io::{self, Write};

/// Longest region text before it is cut short
const MAX_REGION_TEXT: usize = 24;

const SET_COLORS: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Green, Color::Blue];

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramRegion {
    pub mask: RegionMask,
    pub name: String,
    pub text: String,
    pub active: bool,
    pub anchor: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub title: String,
    pub labels: Vec<Label>,
    pub outlines: Vec<Circle>,
    pub regions: Vec<DiagramRegion>,
}

impl Diagram {
    pub fn from_computation(computation: &Computation) -> Self {
        let labels = computation.labels().to_vec();
        let regions = computation
            .regions()
            .iter()
            .filter_map(|region| {
                let anchor = layout::region_anchor(&labels, region.mask)?;
                Some(DiagramRegion {
                    mask: region.mask,
                    name: region.mask.name(&labels),
                    text: region_text(&display_order(&region.elements), region.active),
                    active: region.active,
                    anchor,
                })
            })
            .collect();

        Diagram {
            title: computation.description(),
            outlines: layout::set_outlines(labels.len()).to_vec(),
            labels,
            regions,
        }
    }

    pub fn region(&self, name: &str) -> Option<&DiagramRegion> {
        self.regions.iter().find(|region| region.name == name)
    }
}

fn region_text(elements: &[&str], active: bool) -> String {
    let mut text = if elements.is_empty() {
        "∅".to_string()
    } else {
        elements.join(", ")
    };
    if text.chars().count() > MAX_REGION_TEXT {
        text = text.chars().take(MAX_REGION_TEXT - 1).collect();
        text.push('…');
    }
    if active {
        format!("[{text}]")
    } else {
        text
    }
}

/// Canvas widget for a [`Diagram`]
pub struct VennCanvas<'a> {
    diagram: &'a Diagram,
    marker: Marker,
}

impl<'a> VennCanvas<'a> {
    pub fn new(diagram: &'a Diagram) -> Self {
        VennCanvas {
            diagram,
            marker: Marker::Braille,
        }
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }
}

impl Widget for VennCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let diagram = self.diagram;
        // Canvas units covered by one terminal cell, used to centre texts
        let cell_width = 1.0 / f64::from(area.width.saturating_sub(2).max(1));
        let centred = move |point: Point, text: &str| {
            let half = text.chars().count() as f64 * cell_width / 2.0;
            ((point.x - half).clamp(0.0, 1.0), point.y)
        };

        Canvas::default()
            .block(Block::bordered().title(format!(" {} ", diagram.title)))
            .marker(self.marker)
            .x_bounds([0.0, 1.0])
            .y_bounds([0.0, 1.0])
            .paint(|ctx| {
                for (index, circle) in diagram.outlines.iter().enumerate() {
                    ctx.draw(&CircleShape {
                        x: circle.center.x,
                        y: circle.center.y,
                        radius: circle.radius,
                        color: SET_COLORS[index % SET_COLORS.len()],
                    });
                }
                ctx.layer();

                for (index, label) in diagram.labels.iter().enumerate() {
                    if let Some(point) = layout::set_label_anchor(diagram.labels.len(), index) {
                        let text = label.as_str();
                        let (x, y) = centred(point, text);
                        let text = text.to_string();
                        let style = Style::default()
                            .fg(SET_COLORS[index % SET_COLORS.len()])
                            .add_modifier(Modifier::BOLD);
                        ctx.print(x, y, Line::styled(text, style));
                    }
                }

                for region in &diagram.regions {
                    let style = if region.active {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    let (x, y) = centred(region.anchor, &region.text);
                    ctx.print(x, y, Line::styled(region.text.clone(), style));
                }
            })
            .render(area, buf);
    }
}

/// Draw a diagram into a fresh buffer of the given size
pub fn render_to_buffer(diagram: &Diagram, width: u16, height: u16, marker: Marker) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    VennCanvas::new(diagram).marker(marker).render(area, &mut buffer);
    buffer
}

/// Buffer contents as lines of plain text, trailing spaces removed
pub fn buffer_to_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut lines = Vec::with_capacity(usize::from(area.height));
    for y in area.top()..area.bottom() {
        let line: String = (area.left()..area.right())
            .filter_map(|x| buffer.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect();
        lines.push(line.trim_end().to_string());
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn terminal_color(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as Term;
    match color {
        Color::Black => Term::Black,
        Color::Red => Term::DarkRed,
        Color::Green => Term::DarkGreen,
        Color::Yellow => Term::DarkYellow,
        Color::Blue => Term::DarkBlue,
        Color::Magenta => Term::DarkMagenta,
        Color::Cyan => Term::DarkCyan,
        Color::Gray => Term::Grey,
        Color::DarkGray => Term::DarkGrey,
        Color::LightRed => Term::Red,
        Color::LightGreen => Term::Green,
        Color::LightYellow => Term::Yellow,
        Color::LightBlue => Term::Blue,
        Color::LightMagenta => Term::Magenta,
        Color::LightCyan => Term::Cyan,
        Color::White => Term::White,
        Color::Indexed(index) => Term::AnsiValue(index),
        Color::Rgb(r, g, b) => Term::Rgb { r, g, b },
        Color::Reset => Term::Reset,
    }
}

/// Print a buffer with its colours and bold text as ANSI sequences
pub fn write_colored<W: Write>(out: &mut W, buffer: &Buffer) -> io::Result<()> {
    let area = buffer.area;
    for y in area.top()..area.bottom() {
        let mut color = None;
        let mut bold = false;
        for cell in (area.left()..area.right()).filter_map(|x| buffer.cell((x, y))) {
            if color != Some(cell.fg) {
                queue!(out, SetForegroundColor(terminal_color(cell.fg)))?;
                color = Some(cell.fg);
            }
            let cell_bold = cell.modifier.contains(Modifier::BOLD);
            if cell_bold != bold {
                let attribute = if cell_bold {
                    Attribute::Bold
                } else {
                    Attribute::NormalIntensity
                };
                queue!(out, SetAttribute(attribute))?;
                bold = cell_bold;
            }
            queue!(out, Print(cell.symbol()))?;
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    }
    out.flush()
}
