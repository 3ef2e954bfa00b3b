use std::collections::HashMap;

use itertools::Itertools;
use petgraph::algo::dijkstra;
use petgraph::graphmap::UnGraphMap;

use crate::faucet::Faucets;
use crate::grid::Grid;
use crate::location::Location;
use crate::shape::SquareStep;
use crate::step::WaterCell;

/// Undirected graph of the water-carrying links on a grid.
///
/// A node is an occupied conduit cell; an edge joins two orthogonal neighbours that open toward each other.
/// The edge weight is the direction from the lower-indexed endpoint.
pub(crate) type LinkGraph = UnGraphMap<Location, SquareStep>;

/// Build the [`LinkGraph`] of the grid as it stands.
pub(crate) fn link_graph(grid: &Grid) -> LinkGraph {
    let (width, height) = (grid.width(), grid.height());
    let mut graph = UnGraphMap::with_capacity(
        width * height,
        // "horizontal" links
        (width - 1) * height
            // "vertical" links
            + (height - 1) * width,
    );

    for (location, tile) in grid.tiles() {
        let mask = tile.flow_mask();
        if mask.count() == 0 {
            continue;
        }
        graph.add_node(location);

        // only look right and down; the neighbour's turn covers the other two
        for direction in SquareStep::FORWARD_VARIANTS.iter().filter(|dir| mask.opens(**dir)) {
            let neighbor = direction.attempt_from(location);
            let matched = grid.get(neighbor)
                .is_some_and(|other| other.flow_mask().opens(direction.invert()));
            if matched {
                graph.add_edge(location, neighbor, *direction);
            }
        }
    }

    graph
}

/// The cells reachable from one inlet cell, each labelled with its breadth-first layer.
///
/// Networks are rebuilt on every resolve pass and never stored.
#[derive(Clone, Debug)]
pub(crate) struct Network {
    inlet: Location,
    distances: HashMap<Location, usize>,
}

impl Network {
    /// Flood outward from `inlet`.
    ///
    /// Returns `None` when there is nothing to flood: the inlet cell is empty, carries no water,
    /// or does not open toward the exterior on the inlet side.
    pub(crate) fn explore(graph: &LinkGraph, grid: &Grid, faucets: &Faucets, inlet: Location) -> Option<Self> {
        let tile = grid.get(inlet)?;
        if !tile.flow_mask().opens(faucets.inlet_side()) || !graph.contains_node(inlet) {
            return None;
        }

        // unit edge costs turn shortest-path lengths into breadth-first layers
        let distances = dijkstra(graph, inlet, None, |_| 1usize);

        Some(Self { inlet, distances })
    }

    pub(crate) fn inlet(&self) -> Location {
        self.inlet
    }

    pub(crate) fn len(&self) -> usize {
        self.distances.len()
    }

    pub(crate) fn contains(&self, location: Location) -> bool {
        self.distances.contains_key(&location)
    }

    /// Whether some member sits on the drain edge, at an enabled outlet, open toward the outside.
    pub(crate) fn reaches_drain(&self, grid: &Grid, faucets: &Faucets) -> bool {
        let side = faucets.drain_side();
        self.distances.keys().any(|location| {
            grid.get(*location).is_some_and(|tile| tile.flow_mask().opens(side))
                && faucets.is_drain_opening(*location, side)
        })
    }

    /// Members with their layers, nearest first; ties break by row, then column.
    pub(crate) fn water_cells(&self) -> Vec<WaterCell> {
        self.distances.iter()
            .map(|(location, distance)| WaterCell { location: *location, distance: *distance })
            .sorted_by_key(|cell| (cell.distance, cell.location.1, cell.location.0))
            .collect()
    }

    /// Members in [`water_cells`](Self::water_cells) order.
    pub(crate) fn cells(&self) -> Vec<Location> {
        self.water_cells().into_iter().map(|cell| cell.location).collect()
    }
}
