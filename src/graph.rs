//! Grid graph primitives: the spel lattice and its adjacency relation.
//!
//! The engine sees an image as a graph whose vertices are spels (pixels,
//! voxels, or pixels-in-frame) identified by a linear index, and whose edges
//! connect spels within the chosen neighbourhood. No edge ever crosses the
//! lattice boundary.

use serde::{Deserialize, Serialize};

/// Integer coordinates of a spel within the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Voxel {
    /// Euclidean distance to another voxel.
    #[inline]
    pub fn distance_to(self, other: Voxel) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        let dz = f64::from(self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    #[inline]
    pub(crate) fn shifted(self, offset: (i32, i32, i32)) -> Voxel {
        Voxel {
            x: self.x + offset.0,
            y: self.y + offset.1,
            z: self.z + offset.2,
        }
    }
}

/// The X x Y x Z integer lattice of spels. 2D images use `depth == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl Domain {
    /// Create a lattice of the given extents.
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Total number of spels (X * Y * Z).
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Whether the lattice holds no spel at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the lattice has a non-trivial third axis.
    #[inline]
    pub fn is_3d(&self) -> bool {
        self.depth > 1
    }

    /// Linear index of an in-bounds voxel.
    #[inline]
    pub fn index_of(&self, v: Voxel) -> usize {
        debug_assert!(self.contains(v));
        v.x as usize + self.width * (v.y as usize + self.height * v.z as usize)
    }

    /// Voxel coordinates of a linear index.
    #[inline]
    pub fn voxel_at(&self, index: usize) -> Voxel {
        debug_assert!(index < self.len());
        Voxel {
            x: (index % self.width) as i32,
            y: ((index / self.width) % self.height) as i32,
            z: (index / (self.width * self.height)) as i32,
        }
    }

    /// Whether the voxel lies inside the lattice.
    #[inline]
    pub fn contains(&self, v: Voxel) -> bool {
        v.x >= 0
            && v.y >= 0
            && v.z >= 0
            && (v.x as usize) < self.width
            && (v.y as usize) < self.height
            && (v.z as usize) < self.depth
    }

    /// Length of the lattice diagonal, used to normalise centroid distances.
    pub fn diagonal(&self) -> f64 {
        let w = self.width as f64;
        let h = self.height as f64;
        let d = self.depth as f64;
        (w * w + h * h + d * d).sqrt()
    }
}

/// Ordered list of neighbour offsets around a spel.
///
/// The radius encodes the classical neighbourhoods: squared radius 1 yields
/// 4- (2D) or 6- (3D) adjacency, squared radius 2 yields 8-, and squared
/// radius 3 yields 26-. Offsets are enumerated in a fixed z-y-x scan order so
/// arc visitation is identical across runs.
#[derive(Debug, Clone)]
pub struct Adjacency {
    offsets: Vec<(i32, i32, i32)>,
}

impl Adjacency {
    /// Neighbourhood for a domain: 8/26 with diagonals, 4/6 without.
    pub fn for_domain(domain: &Domain, use_diag: bool) -> Self {
        let radius_sq = match (use_diag, domain.is_3d()) {
            (true, true) => 3,
            (true, false) => 2,
            (false, _) => 1,
        };
        Self::ball(radius_sq, domain.is_3d())
    }

    fn ball(radius_sq: i32, is_3d: bool) -> Self {
        let r = 1; // every supported neighbourhood fits in the unit shell
        let z_range = if is_3d { -r..=r } else { 0..=0 };

        let mut offsets = Vec::new();
        for dz in z_range {
            for dy in -r..=r {
                for dx in -r..=r {
                    if (dx, dy, dz) == (0, 0, 0) {
                        continue;
                    }
                    if dx * dx + dy * dy + dz * dz <= radius_sq {
                        offsets.push((dx, dy, dz));
                    }
                }
            }
        }
        Self { offsets }
    }

    /// Offsets relative to a centre spel, centre excluded.
    #[inline]
    pub fn offsets(&self) -> &[(i32, i32, i32)] {
        &self.offsets
    }

    /// Number of neighbours of an interior spel.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
