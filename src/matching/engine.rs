use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::core::record::Record;
use crate::matching::diagnosis::{ExceptionEntry, ExceptionKind};
use crate::matching::grouping::Group;

/// Outcome of reconciling one group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Records to emit, mates adjacent, in output order
    pub accepted: Vec<Record>,

    /// Entries for the exceptions channel
    pub exceptions: Vec<ExceptionEntry>,
}

impl Reconciliation {
    /// Number of mate pairs written to the main output
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.accepted.len() / 2
    }
}

type Pair<'a> = (&'a Record, &'a Record);

/// Resolve one group into adjacent mate pairs.
///
/// 1. Records are stably sorted by reference name, clustering candidates.
/// 2. Within each cluster every ordered pair `(a, b)` with `a` pointing at
///    `b` as its mate is collected, so true mates are found twice.
/// 3. Repeated and reversed pairs are collapsed onto their first discovery.
/// 4. The surviving records are checked for balance, group-wide and per
///    reference name, before being accepted.
///
/// Single-record groups and clusters without any match produce nothing.
#[must_use]
pub fn reconcile(group: Group) -> Reconciliation {
    let identifier = group.identifier().to_string();
    let mut records = group.into_records();
    if records.len() < 2 {
        return Reconciliation::default();
    }

    records.sort_by(|a, b| a.reference_name().cmp(b.reference_name()));

    let matched: Vec<Pair<'_>> = records
        .chunk_by(|a, b| a.reference_name() == b.reference_name())
        .flat_map(find_mates)
        .collect();
    let pairs = dedup_pairs(matched);

    let candidates: Vec<&Record> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
    let Some(mut reconciliation) = resolve_candidates(&identifier, &candidates) else {
        return Reconciliation {
            accepted: Vec::new(),
            exceptions: vec![ExceptionEntry::for_group(
                ExceptionKind::UnbalancedGroup,
                identifier,
            )],
        };
    };

    for &(a, b) in &pairs {
        debug!(
            identifier = %identifier,
            reference = a.reference_name(),
            first = a.position(),
            second = b.position(),
            order = ?a.mate_order(),
            "Paired mates"
        );
    }

    reconciliation
        .exceptions
        .extend(unpaired_in_paired_clusters(&records, &pairs).map(|record| {
            ExceptionEntry::for_record(ExceptionKind::UnbalancedReference, record)
        }));

    reconciliation
}

/// Every ordered `(a, b)` in a same-reference cluster where `a` names `b` as its mate
fn find_mates(cluster: &[Record]) -> Vec<Pair<'_>> {
    let mut matched = Vec::new();
    if cluster.len() < 2 {
        return matched;
    }
    for (i, a) in cluster.iter().enumerate() {
        for (j, b) in cluster.iter().enumerate() {
            if i != j && a.is_mate_of(b) {
                matched.push((a, b));
            }
        }
    }
    matched
}

/// Keep the first occurrence of each unordered pair, in discovery order.
/// Pairs are compared by record value so duplicate input rows collapse too.
fn dedup_pairs(matched: Vec<Pair<'_>>) -> Vec<Pair<'_>> {
    let mut seen: HashSet<Pair<'_>> = HashSet::with_capacity(matched.len());
    matched
        .into_iter()
        .filter(|&(a, b)| {
            let reversed_seen = seen.contains(&(b, a));
            seen.insert((a, b)) && !reversed_seen
        })
        .collect()
}

/// Apply the balance checks to a pair-adjacent candidate list.
///
/// Returns `None` when the list has odd length: the whole group is then
/// rejected. Otherwise records whose reference name occurs an odd number of
/// times in the list are diverted and the rest accepted in order.
fn resolve_candidates(identifier: &str, candidates: &[&Record]) -> Option<Reconciliation> {
    if candidates.len() % 2 != 0 {
        debug!(identifier, candidates = candidates.len(), "Unbalanced group");
        return None;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in candidates {
        *counts.entry(record.reference_name()).or_default() += 1;
    }

    let mut reconciliation = Reconciliation::default();
    for &record in candidates {
        if counts[record.reference_name()] % 2 == 0 {
            reconciliation.accepted.push(record.clone());
        } else {
            reconciliation.exceptions.push(ExceptionEntry::for_record(
                ExceptionKind::UnbalancedReference,
                record,
            ));
        }
    }
    Some(reconciliation)
}

/// Records left over in a reference cluster that did produce pairs
fn unpaired_in_paired_clusters<'a>(
    records: &'a [Record],
    pairs: &[Pair<'a>],
) -> impl Iterator<Item = &'a Record> {
    let paired: HashSet<&Record> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
    let references: HashSet<&str> = pairs.iter().map(|&(a, _)| a.reference_name()).collect();
    records
        .iter()
        .filter(move |r| references.contains(r.reference_name()) && !paired.contains(r))
}
