/*!
 * Decision Agent Tests
 * Action selection, exploration and error handling
 */

use heap_defrag::policy::{Action, DecisionAgent, PolicyConfig, PolicyError, ValueTable};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn greedy_agent(rows: Vec<[f64; 3]>) -> DecisionAgent<StdRng> {
    let table = ValueTable::from_rows(rows).unwrap();
    DecisionAgent::with_table(table, PolicyConfig::default().greedy(), StdRng::seed_from_u64(0))
        .unwrap()
}

#[test]
fn test_exploits_highest_value() {
    let mut agent = greedy_agent(vec![[0.0, 0.5, -1.0], [-3.0, -2.0, -1.0]]);
    assert_eq!(agent.choose_action(0).unwrap(), Action::Delay);
    assert_eq!(agent.choose_action(1).unwrap(), Action::AdjustIntensity);
}

#[test]
fn test_ties_resolve_to_lowest_action() {
    let mut agent = greedy_agent(vec![[0.0; 3], [-1.0, 2.0, 2.0]]);
    assert_eq!(agent.choose_action(0).unwrap(), Action::Defragment);
    assert_eq!(agent.choose_action(1).unwrap(), Action::Delay);
}

#[test]
fn test_choice_does_not_touch_table() {
    let config = PolicyConfig::default().with_exploration_rate(0.5);
    let mut agent = DecisionAgent::seeded(8, config, 11).unwrap();
    agent.update(3, Action::Delay, -2.0, 4).unwrap();
    let before = agent.table().clone();

    for state in 0..8 {
        for _ in 0..25 {
            agent.choose_action(state).unwrap();
        }
    }

    assert_eq!(agent.table(), &before);
    assert_eq!(agent.updates(), 1);
}

#[test]
fn test_full_exploration_covers_every_action() {
    let config = PolicyConfig::default().with_exploration_rate(1.0);
    let mut agent = DecisionAgent::seeded(1, config, 99).unwrap();

    let mut counts = [0usize; 3];
    for _ in 0..3000 {
        counts[agent.choose_action(0).unwrap().index()] += 1;
    }
    // Uniform over three actions: roughly 1000 each
    for count in counts {
        assert!(count > 800 && count < 1200, "skewed exploration: {:?}", counts);
    }
}

#[test]
fn test_same_seed_same_decisions() {
    let config = PolicyConfig::default();
    let mut a = DecisionAgent::seeded(16, config, 2024).unwrap();
    let mut b = DecisionAgent::seeded(16, config, 2024).unwrap();

    for step in 0..200 {
        let state = step % 16;
        let action_a = a.choose_action(state).unwrap();
        let action_b = b.choose_action(state).unwrap();
        assert_eq!(action_a, action_b);

        let next = (state + 1) % 16;
        a.update(state, action_a, -(next as f64), next).unwrap();
        b.update(state, action_b, -(next as f64), next).unwrap();
    }

    assert_eq!(a.table(), b.table());
}

#[test]
fn test_state_out_of_range() {
    let mut agent = DecisionAgent::seeded(4, PolicyConfig::default(), 1).unwrap();
    assert_eq!(
        agent.choose_action(4),
        Err(PolicyError::StateOutOfRange {
            state: 4,
            states: 4
        })
    );
    assert!(matches!(
        agent.update(0, Action::Delay, 0.0, 9),
        Err(PolicyError::StateOutOfRange { state: 9, .. })
    ));
    assert!(agent.update(9, Action::Delay, 0.0, 0).is_err());
    assert_eq!(agent.updates(), 0);
}

#[test]
fn test_rejects_invalid_parameters() {
    let bad = PolicyConfig::default().with_exploration_rate(1.5);
    assert!(matches!(
        DecisionAgent::seeded(4, bad, 1),
        Err(PolicyError::Config(_))
    ));
    assert!(matches!(
        DecisionAgent::seeded(0, PolicyConfig::default(), 1),
        Err(PolicyError::EmptyStateSpace)
    ));
}
