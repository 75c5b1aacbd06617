//! Unit tests for slots, the refresh gate and the notice board.

#[cfg(test)]
mod state_tests {
    use crate::state::*;
    use std::time::{Duration, Instant};

    // ============= Slot Tests =============

    #[test]
    fn test_slot_new_is_empty() {
        let slot: Slot<u32> = Slot::new();
        assert!(!slot.is_loaded());
        assert!(!slot.in_flight());
        assert!(slot.error().is_none());
    }

    #[test]
    fn test_slot_complete_applies() {
        let mut slot = Slot::new();
        let ticket = slot.begin();
        assert!(slot.in_flight());

        assert_eq!(slot.complete(ticket, "A"), LoadOutcome::Applied);
        assert_eq!(slot.value(), Some(&"A"));
        assert!(!slot.in_flight());
    }

    #[test]
    fn test_slot_out_of_order_completion_is_stale() {
        let mut slot = Slot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert_eq!(slot.complete(second, "B"), LoadOutcome::Applied);
        assert_eq!(slot.complete(first, "A"), LoadOutcome::Stale);
        assert_eq!(slot.value(), Some(&"B"));
    }

    #[test]
    fn test_slot_in_order_completion_applies_both() {
        let mut slot = Slot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert_eq!(slot.complete(first, 1), LoadOutcome::Applied);
        assert!(slot.in_flight());
        assert_eq!(slot.complete(second, 2), LoadOutcome::Applied);
        assert_eq!(slot.value(), Some(&2));
    }

    #[test]
    fn test_slot_failure_keeps_value() {
        let mut slot = Slot::new();
        let ticket = slot.begin();
        slot.complete(ticket, 42);

        let ticket = slot.begin();
        assert_eq!(slot.fail(ticket, "boom"), LoadOutcome::Applied);
        assert_eq!(slot.value(), Some(&42));
        assert_eq!(slot.error(), Some("boom"));

        let ticket = slot.begin();
        slot.complete(ticket, 43);
        assert!(slot.error().is_none());
    }

    #[test]
    fn test_slot_stale_failure_ignored() {
        let mut slot = Slot::new();
        let first = slot.begin();
        let second = slot.begin();

        slot.complete(second, "fresh");
        assert_eq!(slot.fail(first, "late error"), LoadOutcome::Stale);
        assert!(slot.error().is_none());
    }

    // ============= RefreshGate Tests =============

    #[test]
    fn test_gate_is_exclusive() {
        let gate = RefreshGate::new();
        let permit = gate.try_acquire();
        assert!(permit.is_some());
        assert!(gate.is_busy());
        assert!(gate.try_acquire().is_none());

        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_gate_shared_between_clones() {
        let gate = RefreshGate::new();
        let other = gate.clone();
        let _permit = gate.try_acquire().unwrap();
        assert!(other.is_busy());
        assert!(other.try_acquire().is_none());
    }

    // ============= NoticeBoard Tests =============

    fn board() -> NoticeBoard {
        NoticeBoard::new(NoticePolicy::new(Duration::from_secs(3), None))
    }

    #[test]
    fn test_success_notice_expires() {
        let mut notices = board();
        let now = Instant::now();
        notices.push(NoticeKind::Success, "saved", now);

        assert_eq!(notices.active(now + Duration::from_secs(2)).len(), 1);
        assert!(notices.active(now + Duration::from_secs(3)).is_empty());
        assert!(notices.is_empty());
    }

    #[test]
    fn test_error_notice_persists() {
        let mut notices = board();
        let now = Instant::now();
        let id = notices.push(NoticeKind::Error, "failed", now);

        assert_eq!(notices.active(now + Duration::from_secs(3600)).len(), 1);
        assert!(notices.dismiss(id));
        assert!(!notices.dismiss(id));
        assert!(notices.is_empty());
    }

    #[test]
    fn test_error_ttl_when_configured() {
        let mut notices = NoticeBoard::new(NoticePolicy::new(
            Duration::from_secs(3),
            Some(Duration::from_secs(10)),
        ));
        let now = Instant::now();
        notices.push(NoticeKind::Error, "failed", now);
        assert!(notices.active(now + Duration::from_secs(11)).is_empty());
    }

    #[test]
    fn test_active_newest_first() {
        let mut notices = board();
        let now = Instant::now();
        notices.push(NoticeKind::Error, "first", now);
        notices.push(NoticeKind::Warning, "second", now);

        let active = notices.active(now);
        assert_eq!(active[0].message, "second");
        assert_eq!(active[1].message, "first");
        assert_eq!(active[1].kind.tone(), "danger");
    }

    #[test]
    fn test_board_caps_visible_notices() {
        let mut notices = board();
        let now = Instant::now();
        for i in 0..20 {
            notices.push(NoticeKind::Error, format!("error {}", i), now);
        }
        assert_eq!(notices.len(), crate::constants::notices::MAX_VISIBLE);
        assert_eq!(notices.active(now)[0].message, "error 19");
    }
}
