//! The ordered section chain of a line.
//!
//! A line's sections always form a single simple directed path. Growth and
//! shrinkage only happen at the down-terminal, so the chain is stored in
//! path order: the founding section stays at index 0 for the life of the
//! chain and the terminal section is always the last element.

use std::collections::{HashMap, HashSet};

use super::{DomainError, Section, StationId};

/// Ordered, validated collection of a line's sections.
///
/// # Invariants
///
/// - Consecutive sections connect (down station of one = up station of next)
/// - No station is visited twice
/// - New sections are only accepted at the terminal station
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Distance, Section, Sections, StationId};
///
/// let d = Distance::new(10).unwrap();
/// let mut sections = Sections::new();
/// sections.add(Section::new(StationId(1), StationId(2), d).unwrap()).unwrap();
/// sections.add(Section::new(StationId(2), StationId(3), d).unwrap()).unwrap();
///
/// assert_eq!(sections.station_ids(), vec![StationId(1), StationId(2), StationId(3)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    sections: Vec<Section>,
}

impl Sections {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a chain from sections in arbitrary order.
    ///
    /// The start section is derived structurally: it is the only section
    /// whose up station is not some other section's down station. Fails
    /// with [`DomainError::MalformedChain`] if there is not exactly one such
    /// section, if two sections leave the same station, if a station is
    /// revisited, or if some sections are unreachable from the start.
    pub fn restore(unordered: Vec<Section>) -> Result<Self, DomainError> {
        if unordered.is_empty() {
            return Ok(Self::new());
        }

        let downs: HashSet<StationId> = unordered.iter().map(Section::down_station).collect();
        let mut starts = unordered.iter().filter(|s| !downs.contains(&s.up_station()));
        let start = match (starts.next(), starts.next()) {
            (Some(start), None) => *start,
            (None, _) => return Err(DomainError::MalformedChain("no start section")),
            (Some(_), Some(_)) => return Err(DomainError::MalformedChain("multiple start sections")),
        };

        let mut by_up: HashMap<StationId, Section> = HashMap::with_capacity(unordered.len());
        for section in &unordered {
            if by_up.insert(section.up_station(), *section).is_some() {
                return Err(DomainError::MalformedChain("branching sections"));
            }
        }

        let mut ordered = Vec::with_capacity(unordered.len());
        let mut visited = HashSet::with_capacity(unordered.len() + 1);
        visited.insert(start.up_station());
        let mut next = Some(start);
        while let Some(section) = next {
            if !visited.insert(section.down_station()) {
                return Err(DomainError::MalformedChain("station visited twice"));
            }
            ordered.push(section);
            next = by_up.get(&section.down_station()).copied();
        }

        if ordered.len() != unordered.len() {
            return Err(DomainError::MalformedChain("disconnected sections"));
        }

        Ok(Self { sections: ordered })
    }

    /// Stations visited by the line, in path order.
    ///
    /// Has `len() + 1` entries for a non-empty chain and none for an empty one.
    pub fn station_ids(&self) -> Vec<StationId> {
        let Some(first) = self.sections.first() else {
            return Vec::new();
        };

        let mut ids = Vec::with_capacity(self.sections.len() + 1);
        ids.push(first.up_station());
        ids.extend(self.sections.iter().map(Section::down_station));
        ids
    }

    /// Append a section at the terminal.
    ///
    /// The first section added to an empty chain is always accepted and
    /// becomes the start of the line. On error the chain is unchanged.
    pub fn add(&mut self, section: Section) -> Result<(), DomainError> {
        if let Some(terminal) = self.terminal_station() {
            if section.up_station() != terminal {
                return Err(DomainError::DiscontinuousSection {
                    terminal,
                    up: section.up_station(),
                });
            }
            if self.contains_station(section.down_station()) {
                return Err(DomainError::DuplicateStation(section.down_station()));
            }
        }

        self.sections.push(section);
        Ok(())
    }

    /// Remove the terminal section, identified by its down station.
    ///
    /// Returns the removed section. On error the chain is unchanged.
    pub fn remove_terminal(&mut self, station: StationId) -> Result<Section, DomainError> {
        if self.sections.len() < 2 {
            return Err(DomainError::MinimumSections);
        }

        let terminal = self.terminal_station().ok_or(DomainError::MinimumSections)?;
        if terminal != station {
            return Err(DomainError::NotTerminalStation {
                terminal,
                requested: station,
            });
        }

        self.sections.pop().ok_or(DomainError::MinimumSections)
    }

    /// Start station of the line (up station of the founding section).
    pub fn first_station(&self) -> Option<StationId> {
        self.sections.first().map(Section::up_station)
    }

    /// Terminal station of the line (down station of the last section).
    pub fn terminal_station(&self) -> Option<StationId> {
        self.sections.last().map(Section::down_station)
    }

    /// Returns true if the line visits `station`.
    pub fn contains_station(&self, station: StationId) -> bool {
        self.first_station() == Some(station)
            || self.sections.iter().any(|s| s.down_station() == station)
    }

    /// Sum of all section distances.
    pub fn total_distance(&self) -> u64 {
        self.sections
            .iter()
            .map(|s| u64::from(s.distance().get()))
            .sum()
    }

    /// Sections in path order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Returns the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if the line has no sections yet.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Distance;

    const A: StationId = StationId(1);
    const B: StationId = StationId(2);
    const C: StationId = StationId(3);
    const D: StationId = StationId(4);
    const E: StationId = StationId(5);

    fn section(up: StationId, down: StationId, distance: u32) -> Section {
        Section::new(up, down, Distance::new(distance).unwrap()).unwrap()
    }

    fn abc() -> Sections {
        let mut sections = Sections::new();
        sections.add(section(A, B, 10)).unwrap();
        sections.add(section(B, C, 5)).unwrap();
        sections
    }

    #[test]
    fn empty_chain_has_no_stations() {
        let sections = Sections::new();
        assert!(sections.is_empty());
        assert!(sections.station_ids().is_empty());
        assert_eq!(sections.first_station(), None);
        assert_eq!(sections.terminal_station(), None);
        assert_eq!(sections.total_distance(), 0);
    }

    #[test]
    fn first_section_founds_the_line() {
        let mut sections = Sections::new();
        sections.add(section(A, B, 10)).unwrap();

        assert_eq!(sections.station_ids(), vec![A, B]);
        assert_eq!(sections.first_station(), Some(A));
        assert_eq!(sections.terminal_station(), Some(B));
    }

    #[test]
    fn append_extends_terminal() {
        let sections = abc();
        assert_eq!(sections.station_ids(), vec![A, B, C]);
        assert_eq!(sections.terminal_station(), Some(C));
        assert_eq!(sections.total_distance(), 15);
    }

    #[test]
    fn append_revisiting_station_is_rejected() {
        let mut sections = abc();
        let err = sections.add(section(C, A, 3)).unwrap_err();

        assert_eq!(err, DomainError::DuplicateStation(A));
        assert_eq!(sections.station_ids(), vec![A, B, C]);
    }

    #[test]
    fn append_away_from_terminal_is_rejected() {
        let mut sections = abc();
        let err = sections.add(section(D, E, 3)).unwrap_err();

        assert_eq!(err, DomainError::DiscontinuousSection { terminal: C, up: D });
        assert_eq!(sections.station_ids(), vec![A, B, C]);
    }

    #[test]
    fn append_from_interior_station_is_rejected() {
        let mut sections = abc();
        let err = sections.add(section(B, D, 3)).unwrap_err();

        assert_eq!(err, DomainError::DiscontinuousSection { terminal: C, up: B });
        assert_eq!(sections.len(), 2);
    }

    #[test]
    fn remove_terminal_then_minimum_size() {
        let mut sections = abc();

        let removed = sections.remove_terminal(C).unwrap();
        assert_eq!(removed, section(B, C, 5));
        assert_eq!(sections.station_ids(), vec![A, B]);

        let err = sections.remove_terminal(B).unwrap_err();
        assert_eq!(err, DomainError::MinimumSections);
        assert_eq!(sections.station_ids(), vec![A, B]);
    }

    #[test]
    fn remove_interior_station_is_rejected() {
        let mut sections = abc();
        let err = sections.remove_terminal(B).unwrap_err();

        assert_eq!(
            err,
            DomainError::NotTerminalStation {
                terminal: C,
                requested: B
            }
        );
        assert_eq!(sections.station_ids(), vec![A, B, C]);
    }

    #[test]
    fn remove_from_empty_chain_is_minimum_size() {
        let mut sections = Sections::new();
        assert_eq!(sections.remove_terminal(A), Err(DomainError::MinimumSections));
    }

    #[test]
    fn regrow_after_removal() {
        let mut sections = abc();
        sections.remove_terminal(C).unwrap();
        sections.add(section(B, D, 7)).unwrap();

        assert_eq!(sections.station_ids(), vec![A, B, D]);
        assert_eq!(sections.total_distance(), 17);
    }

    #[test]
    fn removed_station_can_be_added_again() {
        let mut sections = abc();
        sections.remove_terminal(C).unwrap();
        sections.add(section(B, C, 5)).unwrap();
        assert_eq!(sections.station_ids(), vec![A, B, C]);
    }

    #[test]
    fn restore_orders_sections() {
        let restored = Sections::restore(vec![
            section(C, D, 1),
            section(A, B, 1),
            section(B, C, 1),
        ])
        .unwrap();

        assert_eq!(restored.station_ids(), vec![A, B, C, D]);
    }

    #[test]
    fn restore_empty() {
        assert!(Sections::restore(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn restore_rejects_cycle() {
        let err = Sections::restore(vec![section(A, B, 1), section(B, A, 1)]).unwrap_err();
        assert_eq!(err, DomainError::MalformedChain("no start section"));
    }

    #[test]
    fn restore_rejects_two_starts() {
        let err = Sections::restore(vec![section(A, B, 1), section(C, D, 1)]).unwrap_err();
        assert_eq!(err, DomainError::MalformedChain("multiple start sections"));
    }

    #[test]
    fn restore_rejects_branching() {
        let err = Sections::restore(vec![
            section(A, B, 1),
            section(B, C, 1),
            section(B, D, 1),
        ])
        .unwrap_err();
        assert_eq!(err, DomainError::MalformedChain("branching sections"));
    }

    #[test]
    fn restore_rejects_path_looping_back() {
        // A -> B -> C -> B: one start, but B is revisited
        let err = Sections::restore(vec![
            section(A, B, 1),
            section(B, C, 1),
            section(C, B, 1),
        ])
        .unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn restore_rejects_detached_cycle() {
        let err = Sections::restore(vec![
            section(A, B, 1),
            section(C, D, 1),
            section(D, C, 1),
        ])
        .unwrap_err();
        assert_eq!(err, DomainError::MalformedChain("disconnected sections"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::Distance;
    use proptest::prelude::*;

    /// Strategy for distinct station ids describing a line of 2..=16 stations.
    fn route() -> impl Strategy<Value = Vec<StationId>> {
        proptest::collection::hash_set(0i64..10_000, 2..=16)
            .prop_map(|ids| ids.into_iter().map(StationId).collect::<Vec<_>>())
            .prop_shuffle()
    }

    fn build(route: &[StationId]) -> Sections {
        let mut sections = Sections::new();
        for pair in route.windows(2) {
            let section = Section::new(pair[0], pair[1], Distance::new(1).unwrap()).unwrap();
            sections.add(section).unwrap();
        }
        sections
    }

    proptest! {
        /// Appending builds a path of len + 1 distinct stations
        #[test]
        fn sequence_has_no_repeats(route in route()) {
            let sections = build(&route);
            let ids = sections.station_ids();
            prop_assert_eq!(ids.len(), sections.len() + 1);
            let unique: HashSet<_> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());
            prop_assert_eq!(ids, route);
        }

        /// A section not starting at the terminal is rejected without mutation
        #[test]
        fn discontinuous_append_leaves_chain(route in route(), fresh in 10_000i64..20_000) {
            let mut sections = build(&route);
            let before = sections.clone();
            let up = route[0];
            let result = sections.add(Section::new(up, StationId(fresh), Distance::new(1).unwrap()).unwrap());
            let is_discontinuous = matches!(result, Err(DomainError::DiscontinuousSection { .. }));
            prop_assert!(is_discontinuous);
            prop_assert_eq!(sections, before);
        }

        /// A section ending at a visited station is rejected without mutation
        #[test]
        fn duplicate_append_leaves_chain(route in route(), pick in any::<prop::sample::Index>()) {
            let mut sections = build(&route);
            let before = sections.clone();
            let terminal = *route.last().unwrap();
            let visited = route[pick.index(route.len() - 1)];
            let result = sections.add(Section::new(terminal, visited, Distance::new(1).unwrap()).unwrap());
            prop_assert_eq!(result, Err(DomainError::DuplicateStation(visited)));
            prop_assert_eq!(sections, before);
        }

        /// Removing the terminal drops exactly the last station
        #[test]
        fn remove_terminal_shrinks_by_one(route in route()) {
            prop_assume!(route.len() >= 3);
            let mut sections = build(&route);
            let terminal = *route.last().unwrap();
            sections.remove_terminal(terminal).unwrap();
            prop_assert_eq!(sections.station_ids(), route[..route.len() - 1].to_vec());
            prop_assert_eq!(sections.terminal_station(), Some(route[route.len() - 2]));
        }

        /// Removing anything but the terminal is rejected without mutation
        #[test]
        fn remove_non_terminal_leaves_chain(route in route(), pick in any::<prop::sample::Index>()) {
            prop_assume!(route.len() >= 3);
            let mut sections = build(&route);
            let before = sections.clone();
            let target = route[pick.index(route.len() - 1)];
            let is_rejected = matches!(
                sections.remove_terminal(target),
                Err(DomainError::NotTerminalStation { .. })
            );
            prop_assert!(is_rejected);
            prop_assert_eq!(sections, before);
        }

        /// Restoring shuffled sections recovers path order
        #[test]
        fn restore_recovers_order(route in route(), seed in any::<u64>()) {
            let sections = build(&route);
            let mut shuffled: Vec<Section> = sections.iter().copied().collect();
            let n = shuffled.len();
            shuffled.rotate_left((seed as usize) % n);
            let restored = Sections::restore(shuffled).unwrap();
            prop_assert_eq!(restored, sections);
        }
    }
}
