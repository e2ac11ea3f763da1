use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use deskpet::model::{BubbleKind, PetStatus, Stat};
use deskpet::{Frame, RenderSink};
use std::io::{self, Write};

use crate::input::{CELL_H, CELL_W};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }
}

pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.prev = CellBuffer::new(cols, rows);
        self.cur = CellBuffer::new(cols, rows);
    }

    /// Viewport size in screen pixels.
    pub(crate) fn viewport(&self) -> (f32, f32) {
        (self.cols as f32 * CELL_W, self.rows as f32 * CELL_H)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        let mut last = None;
        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }
                queue!(self.out, cursor::MoveTo(x, y))?;
                if last != Some((c.fg, c.bg, c.bold)) {
                    queue!(
                        self.out,
                        SetAttribute(Attribute::Reset),
                        SetForegroundColor(c.fg),
                        SetBackgroundColor(c.bg)
                    )?;
                    if c.bold {
                        queue!(self.out, SetAttribute(Attribute::Bold))?;
                    }
                    last = Some((c.fg, c.bg, c.bold));
                }
                queue!(self.out, Print(c.ch))?;
            }
        }
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

impl RenderSink for Terminal {
    fn render(&mut self, frame: &Frame) {
        self.cur.clear();
        status_panel(&mut self.cur, &frame.status);
        draw_pet(&mut self.cur, frame);
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(
            xx,
            y,
            Cell {
                ch,
                fg,
                ..Cell::default()
            },
        );
    }
}

fn bar(value01: f32, width: usize) -> String {
    let fill = (value01.clamp(0.0, 1.0) * width as f32 + 0.5) as usize;
    let mut s = String::from("[");
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

fn status_panel(buf: &mut CellBuffer, st: &PetStatus) {
    let title = format!("Lv {}  exp {}/{}", st.level, st.exp, st.exp_to_next());
    draw_text(buf, 1, 0, &title, Color::White);
    for (i, stat) in Stat::ALL.iter().enumerate() {
        let v = st.get(*stat);
        let line = format!(
            "{:<11} {} {:>5.1}",
            stat.as_str(),
            bar(v / st.caps.get(*stat), 12),
            v
        );
        let fg = if st.wellness(*stat) < 20.0 {
            Color::Red
        } else {
            Color::White
        };
        draw_text(buf, 1, 1 + i as u16, &line, fg);
    }
    let items: Vec<String> = st
        .inventory
        .iter()
        .map(|(id, n)| format!("{id} x{n}"))
        .collect();
    if !items.is_empty() {
        draw_text(buf, 1, 6, &items.join(", "), Color::DarkGrey);
    }
    draw_text(
        buf,
        1,
        buf.h.saturating_sub(1),
        "f feed | c clean | p play | t train | l learn | s special | g gift | m menu | e eyes | x photo | q quit",
        Color::DarkGrey,
    );
}

fn face(expression: &str, blinking: bool) -> [&'static str; 2] {
    let eyes = if blinking {
        "-   -"
    } else {
        match expression {
            "sleepy" => "u   u",
            "sick" => "x   x",
            "look_left" | "look_up_left" | "look_down_left" => "o<  o<",
            "look_right" | "look_up_right" | "look_down_right" => ">o  >o",
            "look_up" => "^   ^",
            "level5" | "level10" | "level15" => "*   *",
            _ => "o   o",
        }
    };
    let mouth = match expression {
        "hungry" => "  O  ",
        "sick" | "sleepy" => "  ~  ",
        "happy" | "level5" | "level10" | "level15" | "idleSpecial" => " \\_/ ",
        _ => "  -  ",
    };
    [eyes, mouth]
}

fn draw_pet(buf: &mut CellBuffer, frame: &Frame) {
    let x0 = (frame.position.x / CELL_W).round().max(0.0) as u16;
    let y0 = (frame.position.y / CELL_H).round().max(0.0) as u16;
    let [eyes, mouth] = face(&frame.expression, frame.blinking);
    let body = [
        "  _______  ".to_string(),
        format!(" /  {eyes:<5}\\ "),
        format!("|   {mouth}   |"),
        " \\_______/ ".to_string(),
    ];
    let fg = if frame.animation.as_deref() == Some("picked-up") {
        Color::Yellow
    } else {
        Color::Cyan
    };
    for (i, line) in body.iter().enumerate() {
        draw_text(buf, x0, y0 + 1 + i as u16, line, fg);
    }
    if let Some(anim) = &frame.animation {
        draw_text(buf, x0, y0 + 5, &format!("~{anim}~"), Color::DarkGrey);
    }
    if let Some(bubble) = &frame.bubble {
        let (open, close) = match bubble.kind {
            BubbleKind::Thought => ('(', ')'),
            BubbleKind::Speech => ('<', '>'),
        };
        let text = format!("{open} {} {close}", bubble.text);
        draw_text(buf, x0, y0, &text, Color::White);
    }
}
