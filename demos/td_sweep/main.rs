use std::{error::Error, fs, path::Path};

use gridworld_td::{
    gym::grid_world::{Action, Pos, GRID_SIZE},
    simulate_multi_parameter, Sweep, SweepConfig,
};

const EPSILONS: [f64; 3] = [0.0, 0.1, 0.5];
const NUM_STEPS: usize = 50_000;
const NUM_RUNS: usize = 5;

fn main() -> Result<(), Box<dyn Error>> {
    let path = Path::new("demos/td_sweep/out");
    fs::create_dir_all(path)?;

    let config = SweepConfig {
        epsilons: EPSILONS.to_vec(),
        runs: NUM_RUNS,
        n_steps: NUM_STEPS,
        ..Default::default()
    };
    let Sweep::Averaged { values, rewards } = simulate_multi_parameter(&config)? else {
        unreachable!("averaged sweep");
    };

    let mut wtr = csv::Writer::from_path(path.join("rewards.csv"))?;
    let mut header = vec!["step".to_string()];
    header.extend(EPSILONS.iter().map(|e| format!("epsilon_{e}")));
    wtr.write_record(&header)?;
    for step in 0..NUM_STEPS {
        let mut record = vec![step.to_string()];
        record.extend(rewards.iter().map(|r| r[step].to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    for (epsilon, (table, history)) in EPSILONS.iter().zip(values.iter().zip(&rewards)) {
        println!("epsilon = {epsilon}: final average reward {:.3}", history[NUM_STEPS - 1]);
        for row in 0..GRID_SIZE as i32 {
            let line: String = (0..GRID_SIZE as i32)
                .map(|col| match table.greedy_action(Pos::new(row, col)) {
                    Action::Up => '^',
                    Action::Down => 'v',
                    Action::Left => '<',
                    Action::Right => '>',
                })
                .collect();
            println!("  {line}");
        }
    }

    Ok(())
}
