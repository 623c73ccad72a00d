use gridsir::{Agent, Config, Engine, Environment, SimError, Status};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn seeded_env(size: usize, p: f64, q: f64, seed: u64) -> Environment<ChaCha12Rng> {
    Environment::new(size, p, q, ChaCha12Rng::seed_from_u64(seed))
        .expect("failed to construct environment")
}

#[test]
fn basic_workflow() {
    init_logger();

    let config_contents = String::new()
        + "seed = 2023\n"
        + "\n"
        + "[model]\n"
        + "size = 30\n"
        + "p = 0.2\n"
        + "q = 0.02\n"
        + "\n"
        + "[init]\n"
        + "n_sus = 895\n"
        + "n_inf = 5\n"
        + "n_recov = 0\n"
        + "\n"
        + "[output]\n"
        + "timesteps = 150\n";

    let cfg = Config::from_toml_str(&config_contents).expect("failed to parse config");
    let mut engine = Engine::generate_initial_condition(cfg).expect("failed to create engine");
    let history = engine
        .perform_simulation()
        .expect("failed to perform simulation");

    assert_eq!(history.len(), 150);
    assert_eq!(history[&0][Status::Infected], 5);
    for census in history.values() {
        assert_eq!(census.total(), 900);
    }
}

#[test]
fn zero_infection_rate_never_adds_infected() {
    init_logger();

    let mut env = seeded_env(5, 0.0, 0.1, 1);
    env.populate_all(40, 10, 5).expect("failed to populate");
    let history = env.run_simulation(100).expect("failed to run");

    for (prev, next) in history.values().zip(history.values().skip(1)) {
        assert!(next[Status::Infected] <= prev[Status::Infected]);
        assert_eq!(next[Status::Susceptible], 40);
    }
}

#[test]
fn zero_recovery_rate_keeps_recovered_fixed() {
    init_logger();

    let mut env = seeded_env(5, 0.7, 0.0, 2);
    env.populate_all(40, 10, 5).expect("failed to populate");
    let history = env.run_simulation(100).expect("failed to run");

    for census in history.values() {
        assert_eq!(census[Status::Recovered], 5);
    }
}

#[test]
fn recovered_agents_stay_recovered() {
    init_logger();

    // On a single cell agents keep their order, so they can be followed by index.
    let mut env = seeded_env(1, 0.5, 0.3, 3);
    env.populate_all(20, 3, 0).expect("failed to populate");

    let statuses = |env: &Environment<ChaCha12Rng>| -> Vec<Status> {
        env.agents().map(Agent::status).collect()
    };

    let mut prev = statuses(&env);
    let mut n_recovered_mid_run = 0;
    for _ in 0..60 {
        env.one_step().expect("failed to perform step");
        let next = statuses(&env);
        assert_eq!(next.len(), prev.len());
        for (before, after) in prev.iter().zip(&next) {
            if *before == Status::Recovered {
                assert_eq!(*after, Status::Recovered);
            } else if *after == Status::Recovered {
                n_recovered_mid_run += 1;
            }
        }
        prev = next;
    }
    assert!(n_recovered_mid_run > 0);
}

#[test]
fn infection_then_recovery_on_single_cell() {
    init_logger();

    let mut env = seeded_env(1, 1.0, 1.0, 4);
    env.insert(Agent::new(Status::Susceptible, (0, 0)))
        .expect("failed to insert");
    env.insert(Agent::new(Status::Infected, (0, 0)))
        .expect("failed to insert");

    let history = env.run_simulation(3).expect("failed to run");

    assert_eq!(history[&0][Status::Susceptible], 1);
    assert_eq!(history[&0][Status::Infected], 1);
    // The newly infected agent cannot recover in the step it was infected.
    assert_eq!(history[&1][Status::Infected], 1);
    assert_eq!(history[&1][Status::Recovered], 1);
    assert_eq!(history[&2][Status::Recovered], 2);
}

#[test]
fn errors_are_reported() {
    assert!(matches!(
        Environment::new(0, 0.5, 0.5, ChaCha12Rng::seed_from_u64(0)),
        Err(SimError::InvalidConfig(_))
    ));

    let mut env = seeded_env(2, 0.5, 0.5, 5);
    assert!(matches!(
        env.run_simulation(0),
        Err(SimError::InvalidArgument(_))
    ));
    assert!(matches!(
        env.insert(Agent::new(Status::Infected, (2, 2))),
        Err(SimError::InvalidLocation { .. })
    ));
}

proptest! {
    #[test]
    fn move_stays_within_boundary(
        boundary in 1usize..12,
        x in 0usize..12,
        y in 0usize..12,
        seed in any::<u64>(),
    ) {
        let start = (x % boundary, y % boundary);
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let mut agt = Agent::new(Status::Susceptible, start);
        for _ in 0..50 {
            let (nx, ny) = agt.move_within(boundary, &mut rng);
            prop_assert!(nx < boundary && ny < boundary);
        }
    }

    #[test]
    fn population_is_conserved(
        size in 1usize..8,
        p in 0.0f64..=1.0,
        q in 0.0f64..=1.0,
        n_sus in 0usize..40,
        n_inf in 0usize..10,
        n_recov in 0usize..10,
        seed in any::<u64>(),
    ) {
        let mut env = seeded_env(size, p, q, seed);
        env.populate_all(n_sus, n_inf, n_recov).unwrap();
        let history = env.run_simulation(20).unwrap();

        prop_assert_eq!(history.len(), 20);
        for census in history.values() {
            prop_assert_eq!(census.total(), n_sus + n_inf + n_recov);
        }
        for x in 0..size {
            for y in 0..size {
                for agt in env.cell((x, y)).unwrap() {
                    prop_assert_eq!(agt.location(), (x, y));
                    prop_assert!(!agt.recently_infected());
                }
            }
        }
    }
}
