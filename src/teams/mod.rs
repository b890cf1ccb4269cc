//! Team selection: ranking players and splitting them between two opponents

pub mod balancer;

pub use balancer::{BalancedTeams, RankedPlayer, Roster, SelectionStrategy, Side, TeamBalancer};
