//! Set difference between the external and the local contact snapshot.
//!
//! Both inputs are treated as sets under full-field equality. A contact whose
//! name or number changed shows up once in each direction.

use crate::model::contact::Contact;
use std::collections::BTreeSet;

/// Writes needed to make the local mirror equal the external snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDiff {
    /// Present externally, absent locally.
    pub to_insert: BTreeSet<Contact>,
    /// Present locally, absent externally.
    pub to_delete: BTreeSet<Contact>,
}

impl ContactDiff {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

/// Computes `external − local` and `local − external`.
pub fn reconcile(external: &[Contact], local: &[Contact]) -> ContactDiff {
    let external: BTreeSet<&Contact> = external.iter().collect();
    let local: BTreeSet<&Contact> = local.iter().collect();

    ContactDiff {
        to_insert: external
            .difference(&local)
            .map(|contact| (*contact).clone())
            .collect(),
        to_delete: local
            .difference(&external)
            .map(|contact| (*contact).clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{reconcile, ContactDiff};
    use crate::model::contact::Contact;
    use std::collections::BTreeSet;

    fn alice() -> Contact {
        Contact::new(1, "Alice", "555-0100")
    }

    fn bob() -> Contact {
        Contact::new(2, "Bob", "555-0101")
    }

    fn carol() -> Contact {
        Contact::new(3, "Carol", "555-0102")
    }

    fn assert_converges(external: &[Contact], local: &[Contact]) {
        let diff = reconcile(external, local);
        assert!(
            diff.to_insert.is_disjoint(&diff.to_delete),
            "insert/delete overlap for external={external:?} local={local:?}"
        );

        let mut mirrored: BTreeSet<Contact> = local.iter().cloned().collect();
        mirrored.extend(diff.to_insert.iter().cloned());
        for contact in &diff.to_delete {
            mirrored.remove(contact);
        }
        let expected: BTreeSet<Contact> = external.iter().cloned().collect();
        assert_eq!(mirrored, expected);

        let converged: Vec<Contact> = expected.into_iter().collect();
        assert!(reconcile(external, &converged).is_empty());
    }

    #[test]
    fn applying_diff_always_reproduces_external_set() {
        let renamed_alice = Contact::new(1, "Alice Smith", "555-0100");
        let cases: Vec<(Vec<Contact>, Vec<Contact>)> = vec![
            (vec![], vec![]),
            (vec![alice()], vec![]),
            (vec![], vec![alice(), bob()]),
            (vec![alice(), bob()], vec![bob(), carol()]),
            (vec![renamed_alice.clone(), bob()], vec![alice(), bob()]),
            (vec![alice(), alice(), bob()], vec![bob(), bob()]),
            (vec![carol(), bob(), alice()], vec![alice(), bob(), carol()]),
        ];

        for (external, local) in cases {
            assert_converges(&external, &local);
        }
    }

    #[test]
    fn new_external_contact_is_inserted_only() {
        let diff = reconcile(&[alice()], &[]);
        assert_eq!(diff.to_insert, BTreeSet::from([alice()]));
        assert!(diff.to_delete.is_empty());
    }

    #[test]
    fn empty_external_snapshot_deletes_everything_local() {
        let diff = reconcile(&[], &[alice(), bob()]);
        assert!(diff.to_insert.is_empty());
        assert_eq!(diff.to_delete, BTreeSet::from([alice(), bob()]));
    }

    #[test]
    fn changed_number_becomes_delete_plus_insert() {
        let moved = Contact::new(2, "Bob", "555-0199");
        let diff = reconcile(&[alice(), moved.clone()], &[alice(), bob()]);
        assert_eq!(
            diff,
            ContactDiff {
                to_insert: BTreeSet::from([moved]),
                to_delete: BTreeSet::from([bob()]),
            }
        );
    }
}
