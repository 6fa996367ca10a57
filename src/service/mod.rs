//! Game service: the outer shell around the pure [`Game`](crate::Game)
//! aggregate.
//!
//! `GameService` loads a game from an [`EventStore`](crate::EventStore),
//! applies a command or countdown tick, persists the resulting events and
//! returns the committed state. Work on one game id is serialized; work on
//! different ids runs independently.
//!
//! ## Quick Start
//!
//! ```
//! use dice_game::{GameConfig, GameService, HashMapEventStore, PlayerId, RandomDice};
//!
//! let service = GameService::new(
//!     HashMapEventStore::new(),
//!     RandomDice::new(Some(1)),
//!     GameConfig::default(),
//! );
//!
//! let id = service.create_game().unwrap();
//! service
//!     .start_game(&id, vec![PlayerId::from("alice"), PlayerId::from("bob")])
//!     .unwrap();
//! let game = service.roll_dice(&id, PlayerId::from("alice")).unwrap();
//! assert!(game.is_running());
//! ```

mod error;
mod game_service;

pub use error::ServiceError;
pub use game_service::GameService;
