//! Interval preprocessing.
//!
//! Turns the globally ordered interval sequence into the index sets the
//! formulation and the extraction work on:
//!
//! - **`index_aircraft_intervals`**: aircraft → sorted interval indices at
//!   which it can be checked, bracketed by the horizon sentinels `0` and `n`.
//! - **`project_station`** / **`StationIndex`**: the intervals and
//!   `(interval, aircraft)` keys that belong to one station.
//!
//! Both outputs are built from ordered containers, so repeated runs over the
//! same snapshot produce identical results.

mod aircraft;
mod station;

pub use aircraft::{index_aircraft_intervals, AircraftIntervals};
pub use station::{project_station, StationIndex, StationProjection};


#[cfg(test)]
mod tests {
    use super::test_support::{day, intervals, roster};
    use super::*;
    use crate::models::Interval;
    use proptest::prelude::*;

    fn arb_intervals() -> impl Strategy<Value = Vec<Interval>> {
        let stations = prop::sample::select(vec!["LHR", "MAN", "GLA"]);
        let fleet = prop::collection::btree_set(
            prop::sample::select(vec!["K1", "K2", "K3", "K4"]),
            0..4,
        );
        prop::collection::vec((stations, fleet), 0..12).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (station, fleet))| {
                    Interval::new(i as u64, day(i as i64), day(i as i64 + 1), station)
                        .with_fleet(fleet)
                })
                .collect()
        })
    }

    fn fleet() -> Vec<String> {
        ["K4", "K2", "K1", "K3"].into_iter().map(String::from).collect()
    }

    proptest! {
        #[test]
        fn prop_indexing_is_idempotent(ivs in arb_intervals()) {
            let a = index_aircraft_intervals(&ivs, &fleet()).unwrap();
            let b = index_aircraft_intervals(&ivs, &fleet()).unwrap();
            prop_assert_eq!(a, b);

            let stations = StationIndex::build(&ivs);
            for station in stations.stations() {
                let first = project_station(&ivs, &fleet(), station);
                let second = project_station(&ivs, &fleet(), station);
                prop_assert_eq!(first, second);
            }
        }

        #[test]
        fn prop_roster_order_does_not_matter(ivs in arb_intervals()) {
            let mut reversed = fleet();
            reversed.reverse();
            prop_assert_eq!(
                index_aircraft_intervals(&ivs, &fleet()).unwrap(),
                index_aircraft_intervals(&ivs, &reversed).unwrap()
            );
        }

        #[test]
        fn prop_indices_sorted_with_sentinels(ivs in arb_intervals()) {
            let idx = index_aircraft_intervals(&ivs, &fleet()).unwrap();
            let n = ivs.len();
            for (_, slots) in idx.iter() {
                prop_assert_eq!(slots.first().copied(), Some(0));
                prop_assert_eq!(slots.last().copied(), Some(n));
                prop_assert!(slots.windows(2).all(|w| w[0] < w[1]));
            }
        }

        #[test]
        fn prop_station_keys_within_indexer(ivs in arb_intervals()) {
            let idx = index_aircraft_intervals(&ivs, &fleet()).unwrap();
            let n = ivs.len();
            let stations = StationIndex::build(&ivs);
            for station in stations.stations() {
                let p = stations.project(&ivs, &fleet(), station);
                for (i, k) in p.keys() {
                    prop_assert!(idx.contains(*i, k));
                }
                for k in p.aircraft() {
                    prop_assert!(p.contains(0, k));
                    prop_assert!(p.contains(n, k));
                }
            }
        }
    }

    #[test]
    fn test_fixture_shape() {
        assert_eq!(intervals().len(), 5);
        assert_eq!(roster().len(), 5);
    }
}
