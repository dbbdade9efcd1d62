//! Translate terminal events into background events.

use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use gambits_core::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Viewport};
use gambits_field::FieldEvent;

/// The background event matching a terminal event, if any.
///
/// Mouse positions land on the centre of the cell under the cursor. Losing
/// focus counts as the pointer leaving the window.
pub fn field_event(event: &Event) -> Option<FieldEvent> {
    match event {
        Event::Resize(cols, rows) => Some(FieldEvent::Resize {
            width: f32::from(*cols) * CELL_WIDTH_PX,
            height: f32::from(*rows) * CELL_HEIGHT_PX,
        }),
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => {
            let position = Viewport::cell_center(*column, *row);
            match kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    Some(FieldEvent::PointerMove(position))
                }
                MouseEventKind::Down(MouseButton::Left) => Some(FieldEvent::PointerDown(position)),
                _ => None,
            }
        }
        Event::FocusLost => Some(FieldEvent::PointerLeave),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_resize_in_pixels() {
        assert_eq!(
            field_event(&Event::Resize(120, 40)),
            Some(FieldEvent::Resize {
                width: 1200.0,
                height: 800.0
            })
        );
    }

    #[test]
    fn test_mouse_maps_to_cell_centre() {
        let Some(FieldEvent::PointerMove(p)) = field_event(&mouse(MouseEventKind::Moved, 3, 2))
        else {
            panic!("expected a pointer move");
        };
        assert_eq!((p.x, p.y), (35.0, 50.0));

        assert!(matches!(
            field_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0)),
            Some(FieldEvent::PointerMove(_))
        ));
        assert!(matches!(
            field_event(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0)),
            Some(FieldEvent::PointerDown(_))
        ));
    }

    #[test]
    fn test_ignored_events() {
        assert_eq!(field_event(&mouse(MouseEventKind::Down(MouseButton::Right), 1, 1)), None);
        assert_eq!(field_event(&mouse(MouseEventKind::ScrollUp, 1, 1)), None);
        assert_eq!(field_event(&Event::FocusGained), None);
    }

    #[test]
    fn test_focus_lost_is_pointer_leave() {
        assert_eq!(field_event(&Event::FocusLost), Some(FieldEvent::PointerLeave));
    }
}
