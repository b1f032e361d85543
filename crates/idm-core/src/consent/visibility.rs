//! Consent transitions on a single data entry.
//!
//! Each transition returns whether the entry changed.

use crate::person::entity::DataEntry;

impl DataEntry {
    /// Record a pending request. A repeated request, or one from an id that
    /// already has access, leaves the entry unchanged.
    pub fn request_access(&mut self, requestor_id: &str) -> bool {
        if self.is_visible_to(requestor_id) || self.has_pending_request(requestor_id) {
            return false;
        }
        self.visibility_requests.push(requestor_id.to_string());
        true
    }

    /// Give `requestor_id` read access and clear its pending request.
    pub fn grant_access(&mut self, requestor_id: &str) -> bool {
        let before = self.visibility_requests.len();
        self.visibility_requests.retain(|id| id != requestor_id);
        let cleared = self.visibility_requests.len() != before;

        if self.is_visible_to(requestor_id) {
            return cleared;
        }
        self.visibility_list.push(requestor_id.to_string());
        true
    }

    /// Take read access away. Pending requests are not touched.
    pub fn revoke_access(&mut self, requestor_id: &str) -> bool {
        let before = self.visibility_list.len();
        self.visibility_list.retain(|id| id != requestor_id);
        self.visibility_list.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DataEntry {
        DataEntry::new("dob", "2000-01-01", "bank1")
    }

    fn disjoint(entry: &DataEntry) -> bool {
        entry
            .visibility_list
            .iter()
            .all(|id| !entry.visibility_requests.contains(id))
    }

    #[test]
    fn test_request_is_idempotent() {
        let mut e = entry();
        assert!(e.request_access("bob"));
        assert!(!e.request_access("bob"));
        assert_eq!(e.visibility_requests, vec!["bob"]);
    }

    #[test]
    fn test_request_after_grant_is_noop() {
        let mut e = entry();
        e.grant_access("bob");
        assert!(!e.request_access("bob"));
        assert!(e.visibility_requests.is_empty());
        assert!(disjoint(&e));
    }

    #[test]
    fn test_grant_moves_request_to_list() {
        let mut e = entry();
        e.request_access("bob");
        e.request_access("carol");

        assert!(e.grant_access("bob"));

        assert_eq!(e.visibility_list, vec!["bob"]);
        assert_eq!(e.visibility_requests, vec!["carol"]);
        assert!(disjoint(&e));
    }

    #[test]
    fn test_grant_is_idempotent() {
        let mut e = entry();
        assert!(e.grant_access("bob"));
        assert!(!e.grant_access("bob"));
        assert_eq!(e.visibility_list, vec!["bob"]);
        assert!(!e.has_pending_request("bob"));
    }

    #[test]
    fn test_grant_without_request() {
        let mut e = entry();
        assert!(e.grant_access("dave"));
        assert!(e.is_visible_to("dave"));
    }

    #[test]
    fn test_revoke_does_not_reinstate_request() {
        let mut e = entry();
        e.request_access("bob");
        e.grant_access("bob");
        e.request_access("carol");

        assert!(e.revoke_access("bob"));

        assert!(e.visibility_list.is_empty());
        assert_eq!(e.visibility_requests, vec!["carol"]);
    }

    #[test]
    fn test_revoke_unknown_is_noop() {
        let mut e = entry();
        e.request_access("bob");
        assert!(!e.revoke_access("bob"));
        assert_eq!(e.visibility_requests, vec!["bob"]);
    }
}
