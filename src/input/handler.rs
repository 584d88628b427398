use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::game::{Action, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Game(Action),
    Quit,
    None,
}

/// Translates terminal events into game intents.
///
/// Keys map one to one. A left-button drag acts as a swipe: the dominant
/// axis of the drag picks the direction, ties going to the vertical axis.
pub struct InputHandler {
    /// Cell where the current drag started
    swipe_start: Option<(u16, u16)>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self { swipe_start: None }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Self::movement(Direction::Up),
            KeyCode::Down => Self::movement(Direction::Down),
            KeyCode::Left => Self::movement(Direction::Left),
            KeyCode::Right => Self::movement(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Self::movement(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Self::movement(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Self::movement(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Self::movement(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Enter => KeyAction::Game(Action::Start),
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Game(Action::TogglePause),
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Game(Action::Reset),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> KeyAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.swipe_start = Some((mouse.column, mouse.row));
                KeyAction::None
            }
            MouseEventKind::Drag(MouseButton::Left) => self.swipe_to(mouse.column, mouse.row),
            MouseEventKind::Up(MouseButton::Left) => {
                let action = self.swipe_to(mouse.column, mouse.row);
                self.swipe_start = None;
                action
            }
            _ => KeyAction::None,
        }
    }

    /// One move per swipe; the start is cleared once a direction is emitted
    fn swipe_to(&mut self, column: u16, row: u16) -> KeyAction {
        let Some((start_column, start_row)) = self.swipe_start else {
            return KeyAction::None;
        };
        let dx = i32::from(column) - i32::from(start_column);
        let dy = i32::from(row) - i32::from(start_row);
        if dx == 0 && dy == 0 {
            return KeyAction::None;
        }

        self.swipe_start = None;
        let direction = if dx.abs() > dy.abs() {
            if dx > 0 { Direction::Right } else { Direction::Left }
        } else if dy > 0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Self::movement(direction)
    }

    fn movement(direction: Direction) -> KeyAction {
        KeyAction::Game(direction.into())
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(press(KeyCode::Up), KeyAction::Game(Action::Move(Direction::Up)));
        assert_eq!(
            press(KeyCode::Down),
            KeyAction::Game(Action::Move(Direction::Down))
        );
        assert_eq!(
            press(KeyCode::Left),
            KeyAction::Game(Action::Move(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Right),
            KeyAction::Game(Action::Move(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(
            press(KeyCode::Char('w')),
            KeyAction::Game(Action::Move(Direction::Up))
        );
        assert_eq!(
            press(KeyCode::Char('a')),
            KeyAction::Game(Action::Move(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Char('s')),
            KeyAction::Game(Action::Move(Direction::Down))
        );
        assert_eq!(
            press(KeyCode::Char('d')),
            KeyAction::Game(Action::Move(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_uppercase() {
        let handler = InputHandler::new();

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::Game(Action::Move(Direction::Up))
        );
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(press(KeyCode::Char(' ')), KeyAction::Game(Action::Start));
        assert_eq!(press(KeyCode::Enter), KeyAction::Game(Action::Start));
        assert_eq!(press(KeyCode::Char('p')), KeyAction::Game(Action::TogglePause));
        assert_eq!(press(KeyCode::Char('P')), KeyAction::Game(Action::TogglePause));
        assert_eq!(press(KeyCode::Char('r')), KeyAction::Game(Action::Reset));
        assert_eq!(press(KeyCode::Char('R')), KeyAction::Game(Action::Reset));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(press(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Char('Q')), KeyAction::Quit);
        assert_eq!(press(KeyCode::Esc), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(press(KeyCode::Char('x')), KeyAction::None);
        assert_eq!(press(KeyCode::Tab), KeyAction::None);
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn swipe(from: (u16, u16), to: (u16, u16)) -> KeyAction {
        let mut handler = InputHandler::new();
        let down = mouse(MouseEventKind::Down(MouseButton::Left), from.0, from.1);
        assert_eq!(handler.handle_mouse_event(down), KeyAction::None);
        handler.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), to.0, to.1))
    }

    #[test]
    fn test_swipe_directions() {
        assert_eq!(swipe((10, 10), (15, 11)), KeyAction::Game(Action::Move(Direction::Right)));
        assert_eq!(swipe((10, 10), (4, 12)), KeyAction::Game(Action::Move(Direction::Left)));
        assert_eq!(swipe((10, 10), (11, 14)), KeyAction::Game(Action::Move(Direction::Down)));
        assert_eq!(swipe((10, 10), (9, 3)), KeyAction::Game(Action::Move(Direction::Up)));
        // Equal travel on both axes counts as vertical
        assert_eq!(swipe((10, 10), (13, 13)), KeyAction::Game(Action::Move(Direction::Down)));
    }

    #[test]
    fn test_swipe_emits_one_move() {
        let mut handler = InputHandler::new();
        handler.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 5));

        assert_eq!(
            handler.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 5)),
            KeyAction::None
        );
        assert_eq!(
            handler.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 2)),
            KeyAction::Game(Action::Move(Direction::Up))
        );
        // Further travel in the same drag is ignored until the next press
        assert_eq!(
            handler.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 9, 2)),
            KeyAction::None
        );
        assert_eq!(
            handler.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 9, 2)),
            KeyAction::None
        );
    }

    #[test]
    fn test_click_and_other_buttons_do_nothing() {
        let mut handler = InputHandler::new();
        handler.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 5));
        assert_eq!(
            handler.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 5, 5)),
            KeyAction::None
        );

        handler.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Right), 5, 5));
        assert_eq!(
            handler.handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Right), 9, 5)),
            KeyAction::None
        );
        assert_eq!(
            handler.handle_mouse_event(mouse(MouseEventKind::ScrollDown, 5, 9)),
            KeyAction::None
        );
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }
}
