use rcswitch_shared::{
    trace::{PulseTrace, Step, TraceDelay, TracePin},
    Code, Error, Inbox, MessageQueue, RcSwitch,
};

fn switch<'a>(
    trace: &PulseTrace,
    inbox: &'a Inbox,
    queue: &'a mut MessageQueue,
) -> RcSwitch<'a, TracePin, TraceDelay> {
    let (_, messages) = queue.split();
    let mut switch = RcSwitch::new(trace.delay(), inbox, messages);
    switch.enable_transmit(trace.pin());
    switch
}

#[test]
fn binary_word_pulse_train() {
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let mut switch = switch(&trace, &inbox, &mut queue);

    switch.set_repeat_transmit(1);
    switch.transmit_binary("10").unwrap();

    assert_eq!(
        trace.pulses(),
        vec![
            (true, 1050),
            (false, 350),
            (true, 350),
            (false, 1050),
            (true, 350),
            (false, 10850),
        ]
    );
    assert_eq!(trace.steps().last(), Some(&Step::Level(false)));
}

#[test]
fn repeats_whole_frame() {
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let mut switch = switch(&trace, &inbox, &mut queue);

    switch.set_repeat_transmit(1);
    switch.transmit_binary("1011").unwrap();
    let once = trace.pulses();
    trace.clear();

    switch.set_repeat_transmit(4);
    switch.transmit_binary("1011").unwrap();

    assert_eq!(trace.pulses(), once.repeat(4));
    assert_eq!(trace.duration(), 4 * (4 * 4 * 350 + 32 * 350));
}

#[test]
fn inverted_protocol_ends_low() {
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let mut switch = switch(&trace, &inbox, &mut queue);

    switch.select_protocol(6);
    switch.set_repeat_transmit(1);
    switch.transmit_binary("1").unwrap();

    assert_eq!(
        trace.steps(),
        vec![
            Step::Level(false),
            Step::Wait(900),
            Step::Level(true),
            Step::Wait(450),
            Step::Level(false),
            Step::Wait(10350),
            Step::Level(true),
            Step::Wait(450),
            Step::Level(false),
        ]
    );
}

#[test]
fn pulse_length_override_keeps_shape() {
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let mut switch = switch(&trace, &inbox, &mut queue);

    switch.select_protocol_with_pulse_length(2, 300);
    switch.set_repeat_transmit(1);
    switch.transmit_binary("0").unwrap();

    assert_eq!(
        trace.pulses(),
        vec![(true, 300), (false, 600), (true, 300), (false, 3000)]
    );
}

#[test]
fn unknown_protocol_falls_back_to_first() {
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let mut switch = switch(&trace, &inbox, &mut queue);

    switch.select_protocol(5);
    assert_eq!(switch.protocol().pulse_length, 500);

    switch.select_protocol(0);
    assert_eq!(switch.protocol(), rcswitch_shared::PROTOCOLS[0]);

    switch.select_protocol(13);
    assert_eq!(switch.protocol(), rcswitch_shared::PROTOCOLS[0]);
}

#[test]
fn disabled_transmitter_is_silent() {
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let (_, messages) = queue.split();
    let mut switch = RcSwitch::<TracePin, TraceDelay>::new(trace.delay(), &inbox, messages);

    assert!(!switch.transmit_enabled());
    switch.transmit_tristate("0F1F").unwrap();
    switch.switch_on_b(1, 1).unwrap();
    assert!(trace.steps().is_empty());

    switch.enable_transmit(trace.pin());
    assert!(switch.disable_transmit().is_some());
    switch.transmit_binary("1").unwrap();
    assert!(trace.steps().is_empty());
}

#[test]
fn bad_input_sends_nothing() {
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let mut switch = switch(&trace, &inbox, &mut queue);

    assert_eq!(switch.transmit_tristate("0F2"), Err(Error::InvalidSymbol('2')));
    assert_eq!(switch.switch_on_b(5, 1), Err(Error::InvalidParameter));
    assert_eq!(switch.switch_on_c('q', 1, 1), Err(Error::InvalidParameter));
    assert_eq!(switch.switch_off_d('e', 1), Err(Error::InvalidParameter));
    assert_eq!(switch.switch_on_a("1101", "10000"), Err(Error::InvalidParameter));
    assert!(trace.steps().is_empty());
}

#[test]
fn family_switch_sends_codeword() {
    let codeword = rcswitch_shared::codeword::codeword_d('b', 2, true).unwrap();
    let expected = PulseTrace::new();
    let inbox = Inbox::new();
    let mut reference_queue = MessageQueue::new();
    let mut reference = switch(&expected, &inbox, &mut reference_queue);
    reference.set_repeat_transmit(2);
    reference.transmit_tristate(codeword.as_str()).unwrap();

    let trace = PulseTrace::new();
    let mut queue = MessageQueue::new();
    let mut switch = switch(&trace, &inbox, &mut queue);
    switch.set_repeat_transmit(2);
    switch.switch_on_d('B', 2).unwrap();

    assert_eq!(trace.steps(), expected.steps());
    // 12 tri-state symbols, two pulses per bit plus sync, twice
    assert_eq!(trace.pulses().len(), 2 * (2 * 24 + 2));
}

#[test]
fn code_longer_than_64_bits_is_rejected() {
    let trace = PulseTrace::new();
    let inbox = Inbox::new();
    let mut queue = MessageQueue::new();
    let mut switch = switch(&trace, &inbox, &mut queue);
    switch.set_repeat_transmit(1);

    assert_eq!(switch.transmit(Code::new(1, 65)), Err(Error::TooLong(64)));
    assert_eq!(switch.transmit(Code::new(1, 100_000)), Err(Error::TooLong(64)));
    assert!(trace.steps().is_empty());

    switch.transmit(Code::new(u64::MAX, 64)).unwrap();
    // 64 one bits plus sync
    assert_eq!(trace.pulses().len(), 2 * 64 + 2);
}
