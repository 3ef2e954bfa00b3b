use crate::faucet::Faucets;
use crate::graph::Network;
use crate::grid::Grid;
use crate::location::Location;
use crate::shape::SquareStep;

/// An open connector on a network cell that does not end somewhere legal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Leak {
    /// Points off the board, but not through an enabled inlet or drain.
    OffBoard { at: Location, direction: SquareStep },
    /// Points at an empty cell.
    IntoEmpty { at: Location, direction: SquareStep },
    /// Points at a tile that is not open back toward it.
    IntoClosed { at: Location, direction: SquareStep },
    /// Points at a matching tile that this network does not contain.
    OutsideNetwork { at: Location, direction: SquareStep },
}

/// Re-walk every connector of every cell in `network` and report the first one that leaks.
///
/// Independent of how the network was found: reachability says what water can get to,
/// this says whether the water stays inside. Cells are checked in wave order, connectors clockwise from up.
pub(crate) fn find_leak(network: &Network, grid: &Grid, faucets: &Faucets) -> Option<Leak> {
    for at in network.cells() {
        let Some(tile) = grid.get(at) else {
            continue;
        };

        for direction in tile.flow_mask().directions() {
            let neighbor = direction.attempt_from(at);

            if !grid.in_bounds(neighbor) {
                if !faucets.is_inlet_opening(at, direction) && !faucets.is_drain_opening(at, direction) {
                    return Some(Leak::OffBoard { at, direction });
                }
                continue;
            }

            match grid.get(neighbor) {
                None => return Some(Leak::IntoEmpty { at, direction }),
                Some(other) if !other.flow_mask().opens(direction.invert()) => {
                    return Some(Leak::IntoClosed { at, direction });
                }
                Some(_) if !network.contains(neighbor) => {
                    return Some(Leak::OutsideNetwork { at, direction });
                }
                Some(_) => {}
            }
        }
    }

    None
}

/// Why a network stays on the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Rejection {
    /// No member opens out through an enabled drain.
    Dry,
    /// Water would escape.
    Leaks(Leak),
}

/// A network can be cleared when it reaches an enabled drain and nothing leaks.
pub(crate) fn validate(network: &Network, grid: &Grid, faucets: &Faucets) -> Result<(), Rejection> {
    if !network.reaches_drain(grid, faucets) {
        return Err(Rejection::Dry);
    }

    match find_leak(network, grid, faucets) {
        Some(leak) => Err(Rejection::Leaks(leak)),
        None => Ok(()),
    }
}
