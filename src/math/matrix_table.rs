// math/matrix_table.rs
use glam::Mat4;

use super::transform_inverse;
use crate::error::{RenderError, Result};

/// Named matrix roles held by a [`MatrixTable`].
///
/// `World`, `View` and `Projection` are written by the caller; every other
/// slot is derived from them on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MatrixSlot {
    World = 0,
    View,
    Projection,
    WorldInverse,
    ViewInverse,
    WorldView,
    WorldProjection,
    ViewProjection,
    WorldViewProjection,
    WorldViewInverse,
    WorldTranspose,
    ViewTranspose,
    WorldInverseTranspose,
    ViewInverseTranspose,
    WorldViewTranspose,
    WorldViewInverseTranspose,
}

impl MatrixSlot {
    pub const COUNT: usize = 16;

    pub const ALL: [MatrixSlot; Self::COUNT] = [
        MatrixSlot::World,
        MatrixSlot::View,
        MatrixSlot::Projection,
        MatrixSlot::WorldInverse,
        MatrixSlot::ViewInverse,
        MatrixSlot::WorldView,
        MatrixSlot::WorldProjection,
        MatrixSlot::ViewProjection,
        MatrixSlot::WorldViewProjection,
        MatrixSlot::WorldViewInverse,
        MatrixSlot::WorldTranspose,
        MatrixSlot::ViewTranspose,
        MatrixSlot::WorldInverseTranspose,
        MatrixSlot::ViewInverseTranspose,
        MatrixSlot::WorldViewTranspose,
        MatrixSlot::WorldViewInverseTranspose,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn bit(self) -> MatrixSlots {
        MatrixSlots::from_bits_truncate(1 << self as u16)
    }

    pub const fn is_base(self) -> bool {
        matches!(
            self,
            MatrixSlot::World | MatrixSlot::View | MatrixSlot::Projection
        )
    }

    /// Slots this one is computed from directly.
    pub const fn dependencies(self) -> &'static [MatrixSlot] {
        use MatrixSlot::*;
        match self {
            World | View | Projection => &[],
            WorldInverse | WorldTranspose => &[World],
            ViewInverse | ViewTranspose => &[View],
            WorldView => &[World, View],
            WorldProjection => &[World, Projection],
            ViewProjection => &[View, Projection],
            WorldViewProjection => &[WorldView, Projection],
            WorldViewInverse | WorldViewTranspose => &[WorldView],
            WorldInverseTranspose => &[WorldInverse],
            ViewInverseTranspose => &[ViewInverse],
            WorldViewInverseTranspose => &[WorldViewInverse],
        }
    }

    /// True if `self` is derived (directly or transitively) from `other`.
    pub fn depends_on(self, other: MatrixSlot) -> bool {
        self.dependencies()
            .iter()
            .any(|&dep| dep == other || dep.depends_on(other))
    }

    /// Every slot whose value must be recomputed when `self` changes.
    pub fn dependents(self) -> MatrixSlots {
        Self::ALL
            .iter()
            .filter(|slot| slot.depends_on(self))
            .fold(MatrixSlots::empty(), |mask, slot| mask | slot.bit())
    }
}

bitflags::bitflags! {
    /// One bit per [`MatrixSlot`], in declaration order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MatrixSlots: u16 {
        const WORLD = 1 << 0;
        const VIEW = 1 << 1;
        const PROJECTION = 1 << 2;
        const WORLD_INVERSE = 1 << 3;
        const VIEW_INVERSE = 1 << 4;
        const WORLD_VIEW = 1 << 5;
        const WORLD_PROJECTION = 1 << 6;
        const VIEW_PROJECTION = 1 << 7;
        const WORLD_VIEW_PROJECTION = 1 << 8;
        const WORLD_VIEW_INVERSE = 1 << 9;
        const WORLD_TRANSPOSE = 1 << 10;
        const VIEW_TRANSPOSE = 1 << 11;
        const WORLD_INVERSE_TRANSPOSE = 1 << 12;
        const VIEW_INVERSE_TRANSPOSE = 1 << 13;
        const WORLD_VIEW_TRANSPOSE = 1 << 14;
        const WORLD_VIEW_INVERSE_TRANSPOSE = 1 << 15;
    }
}

/// Lazily derived transform cache.
///
/// Two masks are kept: `up_to_date` drives recomputation, `dirty` is a sticky
/// "changed since last consumed" marker owned by whoever uploads the values.
#[derive(Debug, Clone)]
pub struct MatrixTable {
    matrices: [Mat4; MatrixSlot::COUNT],
    up_to_date: MatrixSlots,
    dirty: MatrixSlots,
    derivations: u64,
}

impl MatrixTable {
    pub fn new() -> Self {
        // Identity is consistent with every derivation, so the whole table
        // starts valid. Nothing has been consumed yet, so everything is dirty.
        Self {
            matrices: [Mat4::IDENTITY; MatrixSlot::COUNT],
            up_to_date: MatrixSlots::all(),
            dirty: MatrixSlots::all(),
            derivations: 0,
        }
    }

    pub fn set_matrix(&mut self, slot: MatrixSlot, value: Mat4) -> Result<()> {
        if !slot.is_base() {
            return Err(RenderError::DerivedMatrixSlot(slot));
        }
        self.store_base(slot, value);
        Ok(())
    }

    /// Writes a slot already known to be a base slot.
    pub(crate) fn store_base(&mut self, slot: MatrixSlot, value: Mat4) {
        debug_assert!(slot.is_base());
        self.matrices[slot.index()] = value;
        self.up_to_date.insert(slot.bit());

        let dependents = slot.dependents();
        self.up_to_date.remove(dependents);
        self.dirty.insert(dependents | slot.bit());
    }

    pub fn get_matrix(&mut self, slot: MatrixSlot) -> Mat4 {
        if !self.up_to_date.contains(slot.bit()) {
            self.recompute(slot);
        }
        self.matrices[slot.index()]
    }

    /// Last stored value without triggering recomputation.
    pub fn cached(&self, slot: MatrixSlot) -> Mat4 {
        self.matrices[slot.index()]
    }

    pub fn is_up_to_date(&self, slot: MatrixSlot) -> bool {
        self.up_to_date.contains(slot.bit())
    }

    pub fn is_dirty(&self, slot: MatrixSlot) -> bool {
        self.dirty.contains(slot.bit())
    }

    pub fn clear_dirty(&mut self, slot: MatrixSlot) {
        self.dirty.remove(slot.bit());
    }

    pub fn dirty_slots(&self) -> MatrixSlots {
        self.dirty
    }

    pub fn up_to_date_slots(&self) -> MatrixSlots {
        self.up_to_date
    }

    /// Number of derived values computed since construction.
    pub fn derivation_count(&self) -> u64 {
        self.derivations
    }

    fn recompute(&mut self, slot: MatrixSlot) {
        use MatrixSlot::*;

        let value = match slot {
            World | View | Projection => {
                unreachable!("base matrix {slot:?} is always up to date")
            }
            WorldInverse => transform_inverse(self.get_matrix(World)),
            ViewInverse => transform_inverse(self.get_matrix(View)),
            WorldView => self.get_matrix(View) * self.get_matrix(World),
            WorldProjection => self.get_matrix(Projection) * self.get_matrix(World),
            ViewProjection => self.get_matrix(Projection) * self.get_matrix(View),
            WorldViewProjection => self.get_matrix(Projection) * self.get_matrix(WorldView),
            WorldViewInverse => transform_inverse(self.get_matrix(WorldView)),
            WorldTranspose => self.get_matrix(World).transpose(),
            ViewTranspose => self.get_matrix(View).transpose(),
            WorldInverseTranspose => self.get_matrix(WorldInverse).transpose(),
            ViewInverseTranspose => self.get_matrix(ViewInverse).transpose(),
            WorldViewTranspose => self.get_matrix(WorldView).transpose(),
            WorldViewInverseTranspose => self.get_matrix(WorldViewInverse).transpose(),
        };

        debug_assert!(
            slot.dependencies().iter().all(|dep| self.is_up_to_date(*dep)),
            "dependencies of {slot:?} must be current before it is derived"
        );

        self.matrices[slot.index()] = value;
        self.up_to_date.insert(slot.bit());
        self.derivations += 1;
    }
}

impl Default for MatrixTable {
    fn default() -> Self {
        Self::new()
    }
}
