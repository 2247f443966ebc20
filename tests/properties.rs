use std::sync::Mutex;

use mrthreads::engine::{
    self, next_group, IntermediateGroup, MapEmitter, MapReduceClient, ReduceEmitter,
};
use proptest::prelude::*;

/// Emits every `(key, value)` from an item's list; reduce records the group.
struct Passthrough {
    groups: Mutex<Vec<Vec<(u8, u16)>>>,
}

impl MapReduceClient for Passthrough {
    type K1 = usize;
    type V1 = Vec<(u8, u16)>;
    type K2 = u8;
    type V2 = u16;
    type K3 = u8;
    type V3 = u64;

    fn map(
        &self,
        _: &usize,
        pairs: &Vec<(u8, u16)>,
        emit: &mut MapEmitter<'_, u8, u16>,
    ) -> anyhow::Result<()> {
        for &(key, value) in pairs {
            emit.emit(key, value);
        }
        Ok(())
    }

    fn reduce(
        &self,
        group: IntermediateGroup<u8, u16>,
        emit: &ReduceEmitter<'_, u8, u64>,
    ) -> anyhow::Result<()> {
        let key = group[0].0;
        let sum = group.iter().map(|&(_, v)| u64::from(v)).sum();
        self.groups.lock().unwrap().push(group);
        emit.emit(key, sum)?;
        Ok(())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn groups_match_map_output(
        items in prop::collection::vec(
            prop::collection::vec((0u8..20, any::<u16>()), 0..12),
            0..40,
        ),
        threads in 1usize..9,
    ) {
        let input: Vec<(usize, Vec<(u8, u16)>)> = items.iter().cloned().enumerate().collect();
        let client = Passthrough { groups: Mutex::new(Vec::new()) };

        let output = engine::run(&client, &input, threads).unwrap();

        let mut expected: Vec<(u8, u16)> = items.into_iter().flatten().collect();
        let groups = client.groups.into_inner().unwrap();
        let mut actual: Vec<(u8, u16)> = groups.iter().flatten().copied().collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(&actual, &expected);

        let mut keys: Vec<u8> = groups.iter().map(|g| g[0].0).collect();
        for group in &groups {
            prop_assert!(group.iter().all(|(k, _)| *k == group[0].0));
        }
        keys.sort_unstable();
        let before = keys.len();
        keys.dedup();
        prop_assert_eq!(keys.len(), before);
        prop_assert_eq!(output.len(), before);
    }

    #[test]
    fn shuffle_yields_strictly_decreasing_keys(
        mut buffers in prop::collection::vec(prop::collection::vec(any::<i16>(), 0..30), 0..8),
    ) {
        let mut buffers: Vec<Vec<(i16, ())>> = buffers
            .iter_mut()
            .map(|buffer| {
                buffer.sort_unstable();
                buffer.iter().map(|&k| (k, ())).collect()
            })
            .collect();
        let total: usize = buffers.iter().map(Vec::len).sum();

        let mut previous: Option<i16> = None;
        let mut seen = 0;
        while let Some(group) = next_group(&mut buffers) {
            let key = group[0].0;
            prop_assert!(group.iter().all(|(k, _)| *k == key));
            if let Some(prev) = previous {
                prop_assert!(key < prev);
            }
            previous = Some(key);
            seen += group.len();
        }
        prop_assert_eq!(seen, total);
    }
}
