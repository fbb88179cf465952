//! Participant grid presentation
//!
//! Read-side collaborator that maps controller state onto an ordered list of
//! video tiles plus the grid geometry the host UI lays them out with. The
//! presenter never mutates session state.
//!
//! Tile 0 is always the local preview; tiles 1..N are remote streams in
//! subscription order. The grid is empty until the local publication is
//! confirmed: nothing renders before this client is itself visible to the
//! room.

use std::sync::Arc;

use crate::client::RoomClient;
use crate::room::{StreamId, SurfaceHandle};

/// Width-to-height ratio of a grid tile
pub const TILE_ASPECT_RATIO: f32 = 1.33;

/// One renderable tile in the participant grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantTile {
    /// Position in the grid; 0 is the local preview
    pub index: usize,
    /// Rendering surface to resolve against the host UI
    pub surface: SurfaceHandle,
    /// Stream this tile renders
    pub stream_id: StreamId,
    /// Whether this is the local preview tile
    pub is_local: bool,
}

/// Pixel dimensions for every tile in a two-column grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGeometry {
    /// Tile width in points
    pub width: f32,
    /// Tile height in points
    pub height: f32,
}

/// Grid presenter over a [`RoomClient`]
///
/// # Examples
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use mosaic_client_core::{ParticipantGridPresenter, RoomClient};
/// # async fn render(client: Arc<RoomClient>) {
/// let presenter = ParticipantGridPresenter::new(client);
/// for tile in presenter.tiles().await {
///     println!("tile {} -> surface {}", tile.index, tile.surface.id());
/// }
/// # }
/// ```
pub struct ParticipantGridPresenter {
    client: Arc<RoomClient>,
}

impl ParticipantGridPresenter {
    /// Create a presenter over the given client
    pub fn new(client: Arc<RoomClient>) -> Self {
        Self { client }
    }

    /// Number of tiles the grid currently renders
    pub async fn participant_count(&self) -> usize {
        self.client.participant_count().await
    }

    /// Snapshot of the tiles in render order
    ///
    /// Order is stable across calls as long as the stream set does not
    /// change: local first, then remotes in subscription order.
    pub async fn tiles(&self) -> Vec<ParticipantTile> {
        if !self.client.is_publishing().await {
            return Vec::new();
        }
        let local = match self.client.local_publication().await {
            Some(local) => local,
            None => return Vec::new(),
        };

        let mut tiles = vec![ParticipantTile {
            index: 0,
            surface: local.surface,
            stream_id: local.stream_id,
            is_local: true,
        }];
        for (i, remote) in self.client.remote_streams().await.into_iter().enumerate() {
            tiles.push(ParticipantTile {
                index: i + 1,
                surface: remote.surface,
                stream_id: remote.id,
                is_local: false,
            });
        }
        tiles
    }

    /// Tile dimensions for a two-column grid in a container of the given width
    ///
    /// Item width is half the container minus the inter-tile spacing from
    /// the client configuration; height follows [`TILE_ASPECT_RATIO`].
    pub fn tile_geometry(&self, container_width: f32) -> TileGeometry {
        let width = container_width / 2.0 - self.client.config().grid_spacing;
        TileGeometry {
            width,
            height: width / TILE_ASPECT_RATIO,
        }
    }
}
