use vaulta_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use crate::snap::RangeSet;

const FONT_SIZE: f64 = 10.0;
const MARKER_WIDTH: f64 = 2.0;

/// Render a horizontal scroll track: pinned ranges with their buffered
/// snap windows, center ticks, and the current position and snap target.
///
/// The full width of `viewport` spans normalized scroll `[0, 1]`.
pub fn render_scroll_track(
    ranges: &RangeSet,
    viewport: &Viewport,
    position: f64,
    target: Option<f64>,
    buffer: f64,
) -> Vec<RenderCommand> {
    let width = viewport.width;
    let height = viewport.height;
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let to_x = |p: f64| p.clamp(0.0, 1.0) * width;

    let mut commands = Vec::with_capacity(ranges.len() * 4 + 6);
    commands.push(RenderCommand::BeginGroup {
        id: "scroll-track".into(),
        label: Some("Scroll track".into()),
    });

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, width, height),
        color: ThemeToken::TrackBackground,
        border_color: Some(ThemeToken::TrackBorder),
        label: None,
    });

    // Buffered windows first so the ranges draw over them.
    for (_, range) in ranges.iter() {
        let x0 = to_x(range.start - buffer);
        let x1 = to_x(range.end + buffer);
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x0, 0.0, x1 - x0, height),
            color: ThemeToken::SnapBuffer,
            border_color: None,
            label: None,
        });
    }

    for (id, range) in ranges.iter() {
        let x0 = to_x(range.start);
        let x1 = to_x(range.end);
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x0, 0.0, x1 - x0, height),
            color: ThemeToken::PinnedRange,
            border_color: Some(ThemeToken::TrackBorder),
            label: Some(id.to_owned()),
        });
        let cx = to_x(range.center());
        commands.push(RenderCommand::DrawLine {
            from: Point::new(cx, 0.0),
            to: Point::new(cx, height),
            color: ThemeToken::RangeCenter,
            width: 1.0,
        });
    }

    if let Some(target) = target.filter(|t| t.is_finite() && (t - position).abs() > f64::EPSILON) {
        let x = to_x(target);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
            color: ThemeToken::TargetMarker,
            width: MARKER_WIDTH,
        });
    }

    if position.is_finite() {
        let x = to_x(position);
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
            color: ThemeToken::PositionMarker,
            width: MARKER_WIDTH,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, height),
            text: format!("{:.1}%", position * 100.0),
            color: ThemeToken::TextPrimary,
            font_size: FONT_SIZE,
            align: if position > 0.5 {
                TextAlign::Right
            } else {
                TextAlign::Left
            },
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaulta_protocol::SectionExtent;

    fn viewport() -> Viewport {
        Viewport {
            x: 0.0,
            y: 0.0,
            width: 1000.0,
            height: 20.0,
            dpr: 1.0,
        }
    }

    fn ranges() -> RangeSet {
        RangeSet::from_extents(
            &[
                SectionExtent::new("hero", 0.0, 200.0),
                SectionExtent::new("security", 450.0, 650.0),
            ],
            1000.0,
        )
        .unwrap()
    }

    #[test]
    fn draws_labelled_ranges_and_markers() {
        let cmds = render_scroll_track(&ranges(), &viewport(), 0.56, Some(0.55), 0.02);
        let labels: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { label: Some(l), .. } => Some(l.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["hero", "security"]);

        let has_line = |token: ThemeToken| {
            cmds.iter()
                .any(|c| matches!(c, RenderCommand::DrawLine { color, .. } if *color == token))
        };
        assert!(has_line(ThemeToken::PositionMarker));
        assert!(has_line(ThemeToken::TargetMarker));
        assert!(matches!(cmds.first(), Some(RenderCommand::BeginGroup { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::EndGroup)));
    }

    #[test]
    fn buffer_window_is_clamped_to_track() {
        let cmds = render_scroll_track(&ranges(), &viewport(), 0.3, None, 0.02);
        let buffer_rects: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect {
                    rect,
                    color: ThemeToken::SnapBuffer,
                    ..
                } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(buffer_rects.len(), 2);
        assert_eq!(buffer_rects[0].x, 0.0);
        assert!((buffer_rects[1].x - 430.0).abs() < 1e-6);
    }

    #[test]
    fn no_target_marker_while_flowing() {
        let cmds = render_scroll_track(&ranges(), &viewport(), 0.3, Some(0.3), 0.02);
        assert!(!cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawLine {
                color: ThemeToken::TargetMarker,
                ..
            }
        )));
    }

    #[test]
    fn empty_viewport_renders_nothing() {
        let mut vp = viewport();
        vp.width = 0.0;
        assert!(render_scroll_track(&ranges(), &vp, 0.1, None, 0.02).is_empty());
    }
}
