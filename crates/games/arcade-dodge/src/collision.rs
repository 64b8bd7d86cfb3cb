use crate::Obstacle;

/// Axis-aligned box in canvas coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Aabb {
    /// Square box of side `size` centred on `(x, y)`.
    pub fn centered(x: f32, y: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            left: x - half,
            right: x + half,
            top: y - half,
            bottom: y + half,
        }
    }

    /// Strict overlap test: boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// The two solid blocks of a wall, left then right.
pub fn obstacle_blocks(obstacle: &Obstacle, canvas_width: f32) -> [Aabb; 2] {
    let top = obstacle.y;
    let bottom = obstacle.y + obstacle.height;
    [
        Aabb {
            left: 0.0,
            right: obstacle.left_width,
            top,
            bottom,
        },
        Aabb {
            left: canvas_width - obstacle.right_width,
            right: canvas_width,
            top,
            bottom,
        },
    ]
}

/// Whether the player box touches either block of the wall.
pub fn hits_obstacle(player: &Aabb, obstacle: &Obstacle, canvas_width: f32) -> bool {
    obstacle_blocks(obstacle, canvas_width)
        .iter()
        .any(|block| player.overlaps(block))
}

/// First wall the player box overlaps, if any.
pub fn first_hit<'a>(
    player: &Aabb,
    obstacles: &'a [Obstacle],
    canvas_width: f32,
) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|o| hits_obstacle(player, o, canvas_width))
}
