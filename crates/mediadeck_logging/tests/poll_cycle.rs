use mediadeck_logging::{deck_debug, deck_info, initialize_for_tests, next_poll_cycle, poll_cycle};

#[test]
fn poll_cycle_advances_and_repeated_init_is_harmless() {
    initialize_for_tests();
    initialize_for_tests();

    let before = poll_cycle();
    let cycle = next_poll_cycle();
    assert_eq!(cycle, before + 1);
    assert_eq!(poll_cycle(), cycle);

    deck_info!("logging during cycle {}", cycle);
    deck_debug!("still cycle {}", poll_cycle());
    assert_eq!(poll_cycle(), cycle);
}
