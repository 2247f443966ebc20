use std::cmp::Ordering;

use tracing::trace;

use super::channel::GroupChannel;
use super::client::IntermediateGroup;
use super::error::Result;

/// Pull the group with the largest remaining key out of the sorted buffers.
///
/// Each buffer must be sorted ascending, so its largest key sits at the
/// tail and every pair with that key forms a contiguous run ending there.
/// Returns `None` once every buffer is empty.
pub fn next_group<K: Ord, V>(buffers: &mut [Vec<(K, V)>]) -> Option<IntermediateGroup<K, V>> {
    let biggest = buffers
        .iter()
        .filter_map(|buffer| buffer.last())
        .map(|(key, _)| key)
        .max()?;

    // Where each buffer's matching tail run starts. Computed before anything
    // is popped because `biggest` borrows from the buffers.
    let splits: Vec<usize> = buffers
        .iter()
        .map(|buffer| {
            let keep = buffer
                .iter()
                .rev()
                .take_while(|(key, _)| key.cmp(biggest) == Ordering::Equal)
                .count();
            buffer.len() - keep
        })
        .collect();

    let mut group = Vec::new();
    for (buffer, split) in buffers.iter_mut().zip(splits) {
        group.extend(buffer.drain(split..).rev());
    }
    Some(group)
}

/// Drain every buffer into `channel`, one group per distinct key in
/// strictly decreasing key order, then close the channel.
///
/// `should_stop` is polled between groups so the coordinator gives up as
/// soon as another worker has failed.
pub fn shuffle<K: Ord, V>(
    mut buffers: Vec<Vec<(K, V)>>,
    channel: &GroupChannel<IntermediateGroup<K, V>>,
    should_stop: impl Fn() -> bool,
) -> Result<usize> {
    let mut published = 0usize;
    while let Some(group) = next_group(&mut buffers) {
        if should_stop() {
            return Ok(published);
        }
        trace!(size = group.len(), "publishing group");
        channel.publish(group)?;
        published += 1;
    }
    channel.close()?;
    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_all(mut buffers: Vec<Vec<(u32, char)>>) -> Vec<Vec<(u32, char)>> {
        std::iter::from_fn(|| next_group(&mut buffers)).collect()
    }

    #[test]
    fn groups_come_out_largest_key_first() {
        let buffers = vec![
            vec![(1, 'a'), (3, 'b'), (3, 'c')],
            vec![(2, 'd'), (3, 'e')],
            vec![],
            vec![(1, 'f')],
        ];

        let groups = drain_all(buffers);

        let keys: Vec<u32> = groups.iter().map(|g| g[0].0).collect();
        assert_eq!(keys, vec![3, 2, 1]);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1], vec![(2, 'd')]);
        assert_eq!(groups[2].len(), 2);
        for group in &groups {
            assert!(group.iter().all(|(k, _)| *k == group[0].0));
        }
    }

    #[test]
    fn no_buffers_or_only_empty_buffers_yield_nothing() {
        assert!(drain_all(vec![]).is_empty());
        assert!(drain_all(vec![vec![], vec![]]).is_empty());
    }

    #[test]
    fn every_pair_lands_in_exactly_one_group() {
        let buffers = vec![
            vec![(0, 'a'), (0, 'b'), (5, 'c'), (9, 'd')],
            vec![(5, 'e'), (5, 'f'), (7, 'g')],
            vec![(0, 'h'), (9, 'i'), (9, 'j')],
        ];
        let mut expected: Vec<(u32, char)> = buffers.iter().flatten().copied().collect();
        expected.sort_unstable();

        let mut flattened: Vec<(u32, char)> = drain_all(buffers).into_iter().flatten().collect();
        flattened.sort_unstable();

        assert_eq!(flattened, expected);
    }

    #[test]
    fn equivalence_follows_ord_not_eq() {
        // Keys that compare equal on the first field only.
        #[derive(Debug, Clone, PartialEq, Eq)]
        struct Loose(u32, u32);
        impl PartialOrd for Loose {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Loose {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        let mut buffers = vec![vec![(Loose(1, 0), ()), (Loose(1, 1), ())], vec![(Loose(1, 2), ())]];
        let group = next_group(&mut buffers).unwrap();
        assert_eq!(group.len(), 3);
        assert!(next_group(&mut buffers).is_none());
    }

    #[test]
    fn shuffle_publishes_decreasing_keys_and_closes() {
        let channel = GroupChannel::new();
        let buffers = vec![vec![(1, 'a'), (4, 'b')], vec![(2, 'c'), (4, 'd')]];

        let published = shuffle(buffers, &channel, || false).unwrap();
        assert_eq!(published, 3);

        let mut keys = Vec::new();
        while let Some(group) = channel.recv().unwrap() {
            keys.push(group[0].0);
        }
        assert_eq!(keys, vec![4, 2, 1]);
    }

    #[test]
    fn shuffle_stops_when_asked() {
        let channel = GroupChannel::new();
        let buffers = vec![vec![(1, 'a'), (2, 'b'), (3, 'c')]];

        let published = shuffle(buffers, &channel, || true).unwrap();
        assert_eq!(published, 0);
    }
}
