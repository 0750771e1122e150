mod coordinator;
mod router;
mod worker;

pub use coordinator::FleetCoordinator;
pub use router::MovementRouter;
pub use worker::{Decision, Objective, TurnContext, WorkerController};
