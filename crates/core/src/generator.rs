//! Tag generator: the only transition that changes the tag value.

use rand::Rng;

use crate::etag::{ETag, MAX_ETAG_LEN};
use crate::state::ResourceState;

/// Draw a new tag and install it, clearing `pending_change`.
///
/// Length is uniform over `1..=8`, bytes are uniform. A draw identical to
/// the tag being replaced has its last byte perturbed, so every rotation is
/// observable as a change.
pub fn rotate<R: Rng>(state: &mut ResourceState, rng: &mut R) -> ETag {
    let len = rng.gen_range(1..=MAX_ETAG_LEN);
    let mut buf = [0u8; MAX_ETAG_LEN];
    rng.fill(&mut buf[..len]);

    if state.tag().matches(&buf[..len]) {
        buf[len - 1] ^= 0x01;
    }

    let tag = ETag::from_array(buf, len);
    state.install_tag(tag);

    tracing::debug!(
        len = tag.len(),
        etag = %tag,
        "server action: changed ETag"
    );
    tag
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rotate_respects_length_bound() {
        let mut state = ResourceState::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen_lengths = [false; MAX_ETAG_LEN + 1];
        for _ in 0..500 {
            let tag = rotate(&mut state, &mut rng);
            assert!((1..=MAX_ETAG_LEN).contains(&tag.len()));
            assert_eq!(tag.as_bytes().len(), tag.len());
            seen_lengths[tag.len()] = true;
        }
        assert!(seen_lengths[1..].iter().all(|seen| *seen));
    }

    #[test]
    fn test_rotate_clears_pending_and_stores_tag() {
        let mut state = ResourceState::new();
        let mut rng = StdRng::seed_from_u64(1);
        let tag = rotate(&mut state, &mut rng);
        assert!(!state.pending_change());
        assert_eq!(state.tag(), &tag);
    }

    #[test]
    fn test_rotate_never_repeats_previous_tag() {
        let mut state = ResourceState::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut previous = *state.tag();
        for _ in 0..5000 {
            let tag = rotate(&mut state, &mut rng);
            assert_ne!(tag, previous);
            previous = tag;
        }
    }

    /// An RNG that always yields zero forces the collision path.
    struct Zeroes;

    impl rand::RngCore for Zeroes {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_rotate_perturbs_colliding_draw() {
        let mut state = ResourceState::new();
        let tag = rotate(&mut state, &mut Zeroes);
        assert_ne!(tag, ETag::placeholder());
        assert_eq!(tag.as_bytes(), &[0x01]);
    }
}
