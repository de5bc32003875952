use crate::Args;

use anyhow::Result;

pub fn inspect(args: &Args) -> Result<()> {
    let ats = umb::read_ats(&args.input)?;

    println!("time: {:?}", ats.time);
    println!("players: {}", ats.num_players);
    println!("states: {}", ats.num_states());
    println!("  initial: {}", ats.initial_state_indices().len());
    println!("choices: {}", ats.num_choices());
    println!("branches: {}", ats.num_branches());
    if ats.num_observations > 0 {
        println!("observations: {}", ats.num_observations);
    }
    if let Some(ty) = ats.branch_probability_type()? {
        println!("branch-probability-type: {ty:?}");
    }
    if let Some(ty) = ats.exit_rate_type()? {
        println!("exit-rate-type: {ty:?}");
    }
    if !ats.rewards.is_empty() {
        println!("reward annotations:");
        for name in ats.rewards.keys() {
            println!("  {name}");
        }
    }
    if !ats.aps.is_empty() {
        println!("atomic propositions:");
        for name in ats.aps.keys() {
            println!("  {name}");
        }
    }
    if let Some(info) = &ats.model_info {
        if let Some(name) = &info.name {
            println!("model: {name}");
        }
    }

    Ok(())
}
