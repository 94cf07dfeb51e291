use core::fmt;
use core::num::NonZeroU32;

/// Position of a lifting surface in the panel system's ordering.
///
/// Stored as `index + 1` so `Option<SurfaceId>` stays four bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(NonZeroU32);

impl SurfaceId {
    /// `None` for `u32::MAX`, the one index that cannot be shifted.
    pub fn from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Id of the `k`-th surface in a list.
    pub fn nth(k: usize) -> Option<Self> {
        u32::try_from(k).ok().and_then(Self::from_index)
    }

    /// 0-based surface index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.index())
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_survives_shift() {
        for i in [0_u32, 1, 7, 10_000] {
            assert_eq!(SurfaceId::from_index(i).unwrap().index(), i);
        }
        assert_eq!(SurfaceId::nth(3), SurfaceId::from_index(3));
    }

    #[test]
    fn max_index_has_no_id() {
        assert!(SurfaceId::from_index(u32::MAX).is_none());
        assert!(SurfaceId::nth(u32::MAX as usize).is_none());
    }

    #[test]
    fn option_is_niche_packed() {
        assert_eq!(
            core::mem::size_of::<SurfaceId>(),
            core::mem::size_of::<Option<SurfaceId>>()
        );
    }

    #[test]
    fn display_is_bare_index() {
        let id = SurfaceId::from_index(4).unwrap();
        assert_eq!(id.to_string(), "4");
        assert_eq!(format!("{id:?}"), "SurfaceId(4)");
    }
}
