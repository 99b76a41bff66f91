use blockfall_engine::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the play screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(Command),
    Start,
    Restart,
    Quit,
}

/// Maps a key event to actions, in the order they should be applied.
///
/// ↓ turns soft drop on. Releasing ↓, or pressing any other key while soft
/// drop is on, turns it off again. Terminals that do not report releases
/// rely on the second rule alone.
pub fn key_actions(key: &KeyEvent, soft_drop: bool) -> Vec<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return match key.code {
            KeyCode::Down if soft_drop => vec![KeyAction::Game(Command::SoftDropOff)],
            _ => vec![],
        };
    }
    if key.code == KeyCode::Down {
        return vec![KeyAction::Game(Command::SoftDropOn)];
    }

    let action = match key.code {
        KeyCode::Left => Some(KeyAction::Game(Command::MoveLeft)),
        KeyCode::Right => Some(KeyAction::Game(Command::MoveRight)),
        KeyCode::Up => Some(KeyAction::Game(Command::RotateCw)),
        KeyCode::Enter => Some(KeyAction::Start),
        KeyCode::Char('r' | 'R') => Some(KeyAction::Restart),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(KeyAction::Quit),
        _ => None,
    };
    soft_drop
        .then_some(KeyAction::Game(Command::SoftDropOff))
        .into_iter()
        .chain(action)
        .collect()
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind_and_state(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        )
    }

    #[test]
    fn test_arrows_map_to_commands() {
        assert_eq!(
            key_actions(&press(KeyCode::Left), false),
            vec![KeyAction::Game(Command::MoveLeft)]
        );
        assert_eq!(
            key_actions(&press(KeyCode::Right), false),
            vec![KeyAction::Game(Command::MoveRight)]
        );
        assert_eq!(
            key_actions(&press(KeyCode::Up), false),
            vec![KeyAction::Game(Command::RotateCw)]
        );
        assert_eq!(
            key_actions(&press(KeyCode::Down), false),
            vec![KeyAction::Game(Command::SoftDropOn)]
        );
    }

    #[test]
    fn test_held_down_keeps_soft_drop() {
        assert_eq!(
            key_actions(&press(KeyCode::Down), true),
            vec![KeyAction::Game(Command::SoftDropOn)]
        );
    }

    #[test]
    fn test_other_key_ends_soft_drop() {
        assert_eq!(
            key_actions(&press(KeyCode::Left), true),
            vec![
                KeyAction::Game(Command::SoftDropOff),
                KeyAction::Game(Command::MoveLeft)
            ]
        );
        assert_eq!(
            key_actions(&press(KeyCode::Char('x')), true),
            vec![KeyAction::Game(Command::SoftDropOff)]
        );
        assert_eq!(key_actions(&press(KeyCode::Char('x')), false), vec![]);
    }

    #[test]
    fn test_down_release_ends_soft_drop() {
        assert_eq!(
            key_actions(&release(KeyCode::Down), true),
            vec![KeyAction::Game(Command::SoftDropOff)]
        );
        assert_eq!(key_actions(&release(KeyCode::Down), false), vec![]);
        assert_eq!(key_actions(&release(KeyCode::Left), true), vec![]);
    }

    #[test]
    fn test_host_keys() {
        assert_eq!(
            key_actions(&press(KeyCode::Enter), false),
            vec![KeyAction::Start]
        );
        assert_eq!(
            key_actions(&press(KeyCode::Char('r')), false),
            vec![KeyAction::Restart]
        );
        assert_eq!(
            key_actions(&press(KeyCode::Esc), false),
            vec![KeyAction::Quit]
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_actions(&ctrl_c, false), vec![KeyAction::Quit]);
        assert_eq!(key_actions(&press(KeyCode::Char('c')), false), vec![]);
    }
}
