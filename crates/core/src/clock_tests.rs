use super::*;

#[test]
fn fake_clock_starts_at_fixed_epoch() {
    let clock = FakeClock::default();
    assert_eq!(clock.epoch_ms(), 1_704_067_200_000);
}

#[test]
fn fake_clock_advances_by_delta() {
    let clock = FakeClock::default();
    clock.advance_ms(5_000);
    assert_eq!(clock.epoch_ms(), 1_704_067_205_000);
}

#[test]
fn fake_clock_can_be_set_directly() {
    let clock = FakeClock::default();
    clock.set_ms(0);
    assert_eq!(clock.epoch_ms(), 0);
}

#[test]
fn system_clock_is_positive_and_monotonic_enough_for_now() {
    let clock = SystemClock;
    let a = clock.epoch_ms();
    let b = clock.epoch_ms();
    assert!(a > 0);
    assert!(b >= a);
}
