// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based aiming viewer
//!
//! Renders the color (or depth) stream to the terminal using Unicode
//! half-block characters, takes mouse clicks on the image as the aim point
//! and shows the color, depth and laser angles under it.

use crate::angle::{CameraGeometry, PixelCoordinate};
use crate::backends::format_converters::{DepthVisualizationOptions, depth_to_color_frame};
use crate::backends::{ColorFrame, FrameSet, FrameSource, open_source};
use crate::click::{ClickState, PointerButton, PointerEvent};
use crate::config::Config;
use crate::constants::{APP_FOLDER, marker, stream::FRAME_QUEUE_SIZE, timing};
use crate::measure::{MeasureSettings, Measurement, measure};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::channel::mpsc;
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tracing::{debug, error, info};

/// Run the terminal viewer with the given configuration
pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let source = open_source(config)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, source);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

/// Frame source running on its own thread, feeding a bounded channel
///
/// Frames are dropped when the viewer falls behind, so the display always
/// shows a recent frame.
struct FramePipeline {
    receiver: mpsc::Receiver<FrameSet>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl FramePipeline {
    fn start(mut source: Box<dyn FrameSource>) -> io::Result<Self> {
        let (mut sender, receiver) = mpsc::channel(FRAME_QUEUE_SIZE);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let thread = std::thread::Builder::new()
            .name("frame-source".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    match source.next_frameset() {
                        Ok(frameset) => {
                            if let Err(e) = sender.try_send(frameset)
                                && e.is_disconnected()
                            {
                                break;
                            }
                        }
                        Err(e) => {
                            error!(source = %source.name(), error = %e, "Frame source failed");
                            break;
                        }
                    }
                }
                debug!("Frame source thread finished");
            })?;

        Ok(Self {
            receiver,
            stop,
            thread: Some(thread),
        })
    }

    fn try_get_frame(&mut self) -> Option<FrameSet> {
        self.receiver.try_recv().ok()
    }

    fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for FramePipeline {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.receiver.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Color,
    Depth,
}

/// Everything the viewer shows, updated by frames and input
struct ViewerState {
    settings: MeasureSettings,
    depth_options: DepthVisualizationOptions,
    click: ClickState,
    view: ViewMode,
    frameset: Option<FrameSet>,
    depth_frame: Option<ColorFrame>,
    measurement: Option<Measurement>,
    /// Frames per second from the last two capture times
    frame_rate: Option<f64>,
}

impl ViewerState {
    fn new(config: &Config, width: u32, height: u32) -> Result<Self, Box<dyn std::error::Error>> {
        let geometry = Config {
            width,
            height,
            ..config.clone()
        }
        .geometry()?;

        Ok(Self {
            settings: MeasureSettings {
                geometry,
                patch_radius: config.patch_radius,
                clipping_distance: config.clipping_distance_units(),
            },
            depth_options: DepthVisualizationOptions::with_clipping(
                config.clipping_distance_m,
                config.depth_scale,
            ),
            click: ClickState::new(width, height),
            view: ViewMode::Color,
            frameset: None,
            depth_frame: None,
            measurement: None,
            frame_rate: None,
        })
    }

    fn update_frame(&mut self, frameset: FrameSet) {
        if let Some(previous) = &self.frameset {
            let interval = frameset
                .captured_at
                .saturating_duration_since(previous.captured_at)
                .as_secs_f64();
            self.frame_rate = (interval > 0.0).then(|| 1.0 / interval);

            if (previous.width(), previous.height()) != (frameset.width(), frameset.height()) {
                self.resize(frameset.width(), frameset.height());
            }
        }
        self.depth_frame = None;
        self.frameset = Some(frameset);
        self.refresh();
    }

    /// Follow a change of the stream resolution
    fn resize(&mut self, width: u32, height: u32) {
        info!(width, height, "Frame size changed");
        self.click.set_bounds(width, height);
        let geometry = &self.settings.geometry;
        match CameraGeometry::for_resolution(
            width,
            height,
            geometry.hfov_deg(),
            geometry.vfov_deg(),
            geometry.height_offset(),
        ) {
            Ok(geometry) => self.settings.geometry = geometry,
            Err(e) => error!(error = %e, "Keeping previous geometry"),
        }
    }

    fn measurement_line(&self) -> String {
        let Some(measurement) = &self.measurement else {
            return "Waiting for frames...".to_string();
        };
        match self.frame_rate {
            Some(fps) => format!("{} | {:.1} fps", measurement, fps),
            None => measurement.to_string(),
        }
    }

    fn toggle_view(&mut self) {
        self.view = match self.view {
            ViewMode::Color => ViewMode::Depth,
            ViewMode::Depth => ViewMode::Color,
        };
        self.refresh();
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        if self.click.handle(event) {
            info!(pixel = %self.click.position(), "Aim point moved");
            self.refresh();
        }
    }

    /// Recompute the measurement and, in depth view, the depth visualization
    fn refresh(&mut self) {
        let Some(frameset) = &self.frameset else {
            return;
        };

        if self.view == ViewMode::Depth && self.depth_frame.is_none() {
            match depth_to_color_frame(&frameset.depth, &self.depth_options) {
                Ok(frame) => self.depth_frame = Some(frame),
                Err(e) => error!(error = %e, "Depth visualization failed"),
            }
        }

        let measurement = measure(frameset, self.click.position(), &self.settings);
        if measurement.sequence % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(measurement = %measurement, "Measurement");
        }
        self.measurement = Some(measurement);
    }

    fn displayed_frame(&self) -> Option<&ColorFrame> {
        match self.view {
            ViewMode::Color => self.frameset.as_ref().map(|f| &f.color),
            ViewMode::Depth => self.depth_frame.as_ref(),
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
    source: Box<dyn FrameSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height) = source.resolution();
    let source_name = source.name().to_string();
    let mut state = ViewerState::new(config, width, height)?;
    let mut pipeline = FramePipeline::start(source)?;

    let mut show_help = false;
    let mut status_message = build_status_message(&source_name);
    let mut frame_layout: Option<FrameLayout> = None;
    let mut source_stopped = false;

    loop {
        // Drain all available frames to get the latest
        while let Some(frameset) = pipeline.try_get_frame() {
            state.update_frame(frameset);
        }

        if !source_stopped && !pipeline.is_running() {
            source_stopped = true;
            status_message = format!("{} stopped | 'q' quit", source_name);
        }

        let measurement_line = state.measurement_line();

        terminal.draw(|f| {
            let area = f.area();

            // Bottom two lines: measurement and status
            let camera_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(2),
            };

            let frame = state.displayed_frame();
            frame_layout = frame.and_then(|fr| fit_frame(camera_area, fr.width, fr.height));

            f.render_widget(
                FrameWidget {
                    frame,
                    marker: Some(state.click.position()),
                },
                camera_area,
            );

            if area.height >= 2 {
                let measurement_area = Rect {
                    x: area.x,
                    y: area.y + area.height - 2,
                    width: area.width,
                    height: 1,
                };
                f.render_widget(
                    StatusBar {
                        message: &measurement_line,
                        background: Color::Black,
                    },
                    measurement_area,
                );
            }

            let status_area = Rect {
                x: area.x,
                y: area.y + area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            f.render_widget(
                StatusBar {
                    message: &status_message,
                    background: Color::DarkGray,
                },
                status_area,
            );
        })?;

        if !event::poll(timing::INPUT_POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                // Ctrl+C, Esc and 'q' quit
                if (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
                    || key.code == KeyCode::Esc
                    || key.code == KeyCode::Char('q')
                {
                    break;
                }

                match key.code {
                    KeyCode::Char('d') => {
                        state.toggle_view();
                    }
                    KeyCode::Char('p') => {
                        show_help = false;
                        if let Some(frame) = state.displayed_frame() {
                            match save_snapshot(frame, state.click.position()) {
                                Ok(path) => {
                                    status_message = format!("Saved: {}", path.display());
                                }
                                Err(e) => {
                                    error!("Failed to save snapshot: {}", e);
                                    status_message = format!("Error: {}", e);
                                }
                            }
                        }
                    }
                    KeyCode::Char('h') => {
                        show_help = !show_help;
                        status_message = if show_help {
                            build_help_message()
                        } else {
                            build_status_message(&source_name)
                        };
                    }
                    _ => {}
                }
            }
            Event::Mouse(mouse) => {
                let pixel = frame_layout.and_then(|l| l.cell_to_pixel(mouse.column, mouse.row));
                if let Some(pixel) = pixel
                    && let Some(event) = pointer_event(mouse.kind, pixel)
                {
                    state.handle_pointer(event);
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Translate a terminal mouse event over the image into a pointer event
fn pointer_event(kind: MouseEventKind, pixel: PixelCoordinate) -> Option<PointerEvent> {
    let (x, y) = (pixel.col, pixel.row);
    let button = |b: MouseButton| match b {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    };
    match kind {
        MouseEventKind::Down(b) => Some(PointerEvent::Down {
            x,
            y,
            button: button(b),
        }),
        MouseEventKind::Up(b) => Some(PointerEvent::Up {
            x,
            y,
            button: button(b),
        }),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(PointerEvent::Moved { x, y }),
        _ => None,
    }
}

fn build_status_message(source_name: &str) -> String {
    format!(
        "{} | click to aim | 'd' depth | 'p' snapshot | 'h' help | 'q' quit",
        source_name
    )
}

fn build_help_message() -> String {
    "click: Aim | d: Toggle color/depth | p: Save snapshot | h: Toggle help | q/Esc/Ctrl+C: Quit"
        .to_string()
}

/// Save the displayed frame with the aim marker as a PNG
fn save_snapshot(
    frame: &ColorFrame,
    aim: PixelCoordinate,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut img: image::RgbImage =
        image::ImageBuffer::from_raw(frame.width, frame.height, frame.data.to_vec())
            .ok_or("Failed to create image")?;

    draw_marker(&mut img, aim);

    let dir = dirs::picture_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join(APP_FOLDER);
    std::fs::create_dir_all(&dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filepath = dir.join(format!("AIM_{}.png", timestamp));

    img.save(&filepath)?;
    info!(path = %filepath.display(), "Snapshot saved");

    Ok(filepath)
}

/// Draw the aim ring into `img`
fn draw_marker(img: &mut image::RgbImage, aim: PixelCoordinate) {
    let radius = marker::RADIUS as f64;
    let half = marker::THICKNESS as f64 / 2.0;
    let reach = marker::RADIUS + marker::THICKNESS;

    let rows = aim.row.saturating_sub(reach)..=(aim.row + reach).min(img.height() - 1);
    for y in rows {
        let cols = aim.col.saturating_sub(reach)..=(aim.col + reach).min(img.width() - 1);
        for x in cols {
            let d = (x as f64 - aim.col as f64).hypot(y as f64 - aim.row as f64);
            if (d - radius).abs() <= half {
                img.put_pixel(x, y, image::Rgb(marker::COLOR));
            }
        }
    }
}

/// Where a frame sits inside the terminal area
#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameLayout {
    x_offset: u16,
    y_offset: u16,
    /// Size in terminal cells
    width: u16,
    height: u16,
    /// Image pixels per cell column
    x_scale: f64,
    /// Image pixels per half cell
    y_scale: f64,
}

/// Fit a frame into `area` keeping its aspect ratio, centered
///
/// Each terminal cell displays 2 vertical pixels using half-block characters.
fn fit_frame(area: Rect, frame_width: u32, frame_height: u32) -> Option<FrameLayout> {
    if area.width == 0 || area.height == 0 || frame_width == 0 || frame_height == 0 {
        return None;
    }

    let frame_aspect = frame_width as f64 / frame_height as f64;
    let term_width = area.width as f64;
    let term_height = (area.height as f64) * 2.0;

    let (width, height) = if term_width / term_height > frame_aspect {
        // Terminal is wider - fit to height
        let h = term_height;
        let w = h * frame_aspect;
        (w as u16, (h / 2.0) as u16)
    } else {
        // Terminal is taller - fit to width
        let w = term_width;
        let h = w / frame_aspect;
        (w as u16, (h / 2.0) as u16)
    };

    if width == 0 || height == 0 {
        return None;
    }

    Some(FrameLayout {
        x_offset: area.x + (area.width.saturating_sub(width)) / 2,
        y_offset: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
        x_scale: frame_width as f64 / width as f64,
        y_scale: frame_height as f64 / (height as f64 * 2.0),
    })
}

impl FrameLayout {
    /// Image pixel under the center of a terminal cell
    fn cell_to_pixel(&self, column: u16, row: u16) -> Option<PixelCoordinate> {
        if column < self.x_offset
            || row < self.y_offset
            || column >= self.x_offset + self.width
            || row >= self.y_offset + self.height
        {
            return None;
        }
        let tx = (column - self.x_offset) as f64;
        let ty = (row - self.y_offset) as f64;
        Some(PixelCoordinate::new(
            ((ty * 2.0 + 1.0) * self.y_scale) as u32,
            ((tx + 0.5) * self.x_scale) as u32,
        ))
    }

    /// Whether the half cell sampling `(x, y)` falls on the aim ring
    fn on_marker(&self, x: u32, y: u32, aim: PixelCoordinate) -> bool {
        let d = (x as f64 - aim.col as f64).hypot(y as f64 - aim.row as f64);
        // At coarse scales the ring is wider than a pixel to stay visible
        let tolerance = (marker::THICKNESS as f64 / 2.0).max(self.x_scale.max(self.y_scale) / 2.0);
        (d - marker::RADIUS as f64).abs() <= tolerance
    }
}

/// Widget that renders a frame with the aim ring using half-block characters
struct FrameWidget<'a> {
    frame: Option<&'a ColorFrame>,
    marker: Option<PixelCoordinate>,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.frame.and_then(|f| fit_frame(area, f.width, f.height).map(|l| (f, l)));
        let Some((frame, layout)) = layout else {
            let msg = "Waiting for frames...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, ratatui::style::Style::default());
            }
            return;
        };

        let marker_color = Color::Rgb(marker::COLOR[0], marker::COLOR[1], marker::COLOR[2]);

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..layout.height {
            for tx in 0..layout.width {
                let term_x = layout.x_offset + tx;
                let term_y = layout.y_offset + ty;

                let src_x = (tx as f64 * layout.x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * layout.y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * layout.y_scale) as u32;

                let half_color = |y: u32| {
                    if let Some(aim) = self.marker
                        && layout.on_marker(src_x, y, aim)
                    {
                        marker_color
                    } else {
                        let [r, g, b] = frame.pixel(PixelCoordinate::new(y, src_x));
                        Color::Rgb(r, g, b)
                    }
                };

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(half_color(src_y_top));
                    cell.set_bg(half_color(src_y_bottom));
                }
            }
        }
    }
}

/// Single-line status widget
struct StatusBar<'a> {
    message: &'a str,
    background: Color,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(self.background);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();

        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(self.background),
        );
    }
}
