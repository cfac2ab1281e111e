use alloc::collections::VecDeque;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// State change reported by the [`GameManager`], in the order it happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// Emitted once per mine when a game starts. Only meant for debug hints.
    MineLocated { coords: Coord2 },
    CellRevealed {
        coords: Coord2,
        adjacent_mines: u8,
        has_mine: bool,
    },
    CellFlagChanged { coords: Coord2, flagged: bool },
    /// A flag on a safe cell, reported while cleaning up a lost game.
    CellMisflagged { coords: Coord2 },
    Exploded { coords: Coord2 },
    GameWon,
    GameLost,
}

impl GameEvent {
    /// The cell this event is about, if any.
    pub const fn coords(&self) -> Option<Coord2> {
        use GameEvent::*;
        match *self {
            MineLocated { coords }
            | CellRevealed { coords, .. }
            | CellFlagChanged { coords, .. }
            | CellMisflagged { coords }
            | Exploded { coords } => Some(coords),
            GameWon | GameLost => None,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::GameWon | Self::GameLost)
    }
}

/// Receiver of [`GameEvent`]s, passed into every [`GameManager`] operation that can change state.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl EventSink for VecDeque<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push_back(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct EventFn<F>(pub F);

impl<F: FnMut(GameEvent)> EventSink for EventFn<F> {
    fn emit(&mut self, event: GameEvent) {
        (self.0)(event);
    }
}

/// Drops every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiscardEvents;

impl EventSink for DiscardEvents {
    fn emit(&mut self, _event: GameEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_sink_sees_every_event() {
        let mut seen = 0;
        let mut sink = EventFn(|_: GameEvent| seen += 1);

        sink.emit(GameEvent::GameWon);
        sink.emit(GameEvent::Exploded { coords: (1, 2) });

        assert_eq!(seen, 2);
    }

    #[test]
    fn coords_and_terminal_flags() {
        let revealed = GameEvent::CellRevealed {
            coords: (3, 4),
            adjacent_mines: 2,
            has_mine: false,
        };

        assert_eq!(revealed.coords(), Some((3, 4)));
        assert!(!revealed.is_terminal());
        assert_eq!(GameEvent::GameLost.coords(), None);
        assert!(GameEvent::GameLost.is_terminal());
    }

    #[test]
    fn events_serialize_externally_tagged() {
        let json = serde_json::to_string(&GameEvent::CellFlagChanged {
            coords: (0, 7),
            flagged: true,
        })
        .unwrap();

        assert_eq!(json, r#"{"CellFlagChanged":{"coords":[0,7],"flagged":true}}"#);
        assert_eq!(serde_json::to_string(&GameEvent::GameWon).unwrap(), r#""GameWon""#);
    }

    #[test]
    fn events_deserialize_back() {
        let event: GameEvent = serde_json::from_str(r#"{"Exploded":{"coords":[2,5]}}"#).unwrap();

        assert_eq!(event, GameEvent::Exploded { coords: (2, 5) });
    }
}
