// Reference table for the numerology engine.
//
// Every entry here mirrors observed behavior of the annotation rules:
// pattern hits in left-to-right match order, then cumulative magnitude
// flags. The joined string form is asserted because concatenation order
// is part of the contract.

use boostbot::boost::numerology::Numerology;

fn decorate(amount: u64) -> String {
    Numerology::new().decorate(amount)
}

#[test]
fn bowling_runs() {
    assert_eq!(decorate(10), "🎳");
    assert_eq!(decorate(1010), "🎳🎳");
    assert_eq!(decorate(101010), "🎳🎳🎳🦃🔥🔥🔥");
    assert_eq!(decorate(10101010), "🎳🎳🎳🎳🦃🦃🔥🔥🔥");
    assert_eq!(decorate(1010101010), "🎳🎳🎳🎳🎳🦃🦃🦃🔥🔥🔥");
}

#[test]
fn eights() {
    assert_eq!(decorate(6006), "🎱🎱");
    assert_eq!(decorate(6008), "🎱🎱");
    assert_eq!(decorate(8006), "🎱🎱");
    assert_eq!(decorate(8008), "🎱🎱");
}

#[test]
fn ducks_in_a_row() {
    assert_eq!(decorate(2), "🦆💩");
    assert_eq!(decorate(22), "🦆🦆");
    assert_eq!(decorate(222), "🦆🦆🦆");
    assert_eq!(decorate(2222), "🦆🦆🦆🦆");
    assert_eq!(decorate(22222), "🦆🦆🦆🦆🦆🔥");
    assert_eq!(decorate(222222), "🦆🦆🦆🦆🦆🦆🔥🔥🔥");
    assert_eq!(decorate(2222222), "🦆🦆🦆🦆🦆🦆🦆🔥🔥🔥");
}

#[test]
fn dice() {
    assert_eq!(decorate(11), "🎲");
    assert_eq!(decorate(1111), "🎲🎲");
    assert_eq!(decorate(111111), "🎲🎲🎲🔥🔥🔥");
}

#[test]
fn coins() {
    assert_eq!(decorate(21), "🪙");
    assert_eq!(decorate(2121), "🪙🪙");
    assert_eq!(decorate(212121), "🪙🪙🪙🔥🔥🔥");
}

#[test]
fn magic_numbers() {
    assert_eq!(decorate(33), "✨");
    assert_eq!(decorate(333), "✨");
    assert_eq!(decorate(3333), "✨✨");
    assert_eq!(decorate(33333), "✨✨🔥");
}

#[test]
fn kisses() {
    assert_eq!(decorate(69), "💋");
    assert_eq!(decorate(6969), "💋💋");
    assert_eq!(decorate(696969), "💋💋💋🔥🔥🔥");
}

#[test]
fn stoner() {
    assert_eq!(decorate(420), "✌👽💨");
    assert_eq!(decorate(420420), "✌👽💨✌👽💨🔥🔥🔥");
}

#[test]
fn devil() {
    assert_eq!(decorate(666), "😈");
    assert_eq!(decorate(666666), "😈😈🔥🔥🔥");
}

#[test]
fn flags_wolf_and_boost() {
    assert_eq!(decorate(1776), "🇺🇸");
    assert_eq!(decorate(1867), "🇨🇦");
    assert_eq!(decorate(9653), "🐺");
    assert_eq!(decorate(30057), "🔁🔥");
}

#[test]
fn pie() {
    assert_eq!(decorate(314), "🥧");
    assert_eq!(decorate(3141), "🥧🥧");
    assert_eq!(decorate(31415), "🥧🥧🥧🔥");
    assert_eq!(decorate(314159), "🥧🥧🥧🥧🔥🔥🔥");
    assert_eq!(decorate(3141592), "🥧🥧🥧🥧🥧🔥🔥🔥");
    assert_eq!(decorate(314314), "🥧🥧🔥🔥🔥");
    assert_eq!(decorate(1314), "🥧");
    assert_eq!(decorate(3142), "🥧");
}

#[test]
fn countdowns() {
    assert_eq!(decorate(321), "💥");
    assert_eq!(decorate(4321), "💥💥");
    assert_eq!(decorate(54321), "💥💥💥🔥🔥");
    assert_eq!(decorate(654321), "💥💥💥💥🔥🔥🔥");
    assert_eq!(decorate(7654321), "💥💥💥💥💥🔥🔥🔥");
    assert_eq!(decorate(87654321), "💥💥💥💥💥💥🔥🔥🔥");
    assert_eq!(decorate(987654321), "💥💥💥💥💥💥💥🔥🔥🔥");
}

#[test]
fn combinations_preserve_match_order() {
    assert_eq!(decorate(2169), "🪙💋");
    assert_eq!(decorate(6921), "💋🪙");
    assert_eq!(decorate(3369), "✨💋");
    assert_eq!(decorate(6933), "💋✨");
    assert_eq!(decorate(1021), "🎳🪙");
    assert_eq!(decorate(1011), "🎳🎲");
    assert_eq!(decorate(2110), "🪙🎳");
    assert_eq!(decorate(1069), "🎳💋");
    assert_eq!(decorate(6910), "💋🎳");
    assert_eq!(decorate(7388), "👋🥰");
    assert_eq!(decorate(8873), "🥰👋");
    assert_eq!(decorate(31433), "🥧✨🔥");
    assert_eq!(decorate(69314), "💋🥧🔥🔥");
    assert_eq!(decorate(10321), "🎳💥🔥");
    assert_eq!(decorate(32121), "💥🪙🔥");
    assert_eq!(decorate(2130057), "🪙🔁🔥🔥🔥");
}

#[test]
fn symbol_groups_are_ordered_not_sorted() {
    let engine = Numerology::new();
    assert_eq!(engine.annotate(2169), vec!["🪙", "💋"]);
    assert_eq!(engine.annotate(6921), vec!["💋", "🪙"]);
}
