use std::collections::VecDeque;

use crate::constants::RAM_SIZE;
use crate::display::{Display, Event};

/// Arguments of one recorded `draw_sprite` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DrawCall {
    pub start: u16,
    pub height: u8,
    pub x: u8,
    pub y: u8,
}

/// Scripted display for tests: records what the VM asked for and replays a
/// canned event sequence, reporting `Event::None` once it runs out.
pub(crate) struct MockDisplay {
    pub cleared: bool,
    pub draws: Vec<DrawCall>,
    pub collision: bool,
    pub events: VecDeque<Event>,
    pub key: u8,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::with_events(&[])
    }

    pub fn with_events(events: &[Event]) -> Self {
        MockDisplay {
            cleared: false,
            draws: Vec::new(),
            collision: false,
            events: events.iter().copied().collect(),
            key: 0,
        }
    }
}

impl Display for MockDisplay {
    fn clear_screen(&mut self) {
        self.cleared = true;
    }

    fn draw_sprite(
        &mut self,
        start: u16,
        height: u8,
        x: u8,
        y: u8,
        _memory: &[u8; RAM_SIZE],
    ) -> bool {
        self.draws.push(DrawCall { start, height, x, y });
        self.collision
    }

    fn poll_events(&mut self) -> Event {
        self.events.pop_front().unwrap_or(Event::None)
    }

    fn get_key(&mut self) -> u8 {
        self.key
    }
}
