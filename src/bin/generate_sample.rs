use std::env;

use anyhow::Context;
use serde::Serialize;

const TEAMS: [&str; 20] = [
    "Arsenal", "Aston Villa", "Bournemouth", "Brentford", "Brighton", "Burnley", "Chelsea",
    "Crystal Palace", "Everton", "Fulham", "Liverpool", "Luton", "Man City", "Man United",
    "Newcastle", "Nott'm Forest", "Sheffield United", "Tottenham", "West Ham", "Wolves",
];

const REFEREES: [&str; 8] = [
    "M Oliver", "A Taylor", "S Hooper", "P Tierney", "C Kavanagh", "J Brooks", "R Jones", "D England",
];

/// One row in football-data.co.uk column layout.
#[derive(Serialize)]
struct MatchRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "HomeTeam")]
    home_team: &'static str,
    #[serde(rename = "AwayTeam")]
    away_team: &'static str,
    #[serde(rename = "FTHG")]
    home_goals: Option<u32>,
    #[serde(rename = "FTAG")]
    away_goals: Option<u32>,
    #[serde(rename = "FTR")]
    result: &'static str,
    #[serde(rename = "Referee")]
    referee: Option<&'static str>,
    #[serde(rename = "HS")]
    home_shots: u32,
    #[serde(rename = "AS")]
    away_shots: u32,
    #[serde(rename = "HR")]
    home_reds: u32,
    #[serde(rename = "AR")]
    away_reds: u32,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Knuth's product-of-uniforms method; fine for small means.
    fn poisson(&mut self, mean: f64) -> u32 {
        let limit = (-mean).exp();
        let mut k = 0;
        let mut p = self.next_f64();
        while p > limit {
            k += 1;
            p *= self.next_f64();
        }
        k
    }
}

const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendar date in `dd/mm/yyyy`, starting 11/08/2023, moved forward by `days`.
fn match_date(days: u32) -> String {
    let (mut day, mut month, mut year) = (11u32, 8u32, 2023u32);
    for _ in 0..days {
        let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
        let len = if month == 2 && !leap { 28 } else { DAYS_IN_MONTH[month as usize - 1] };
        day += 1;
        if day > len {
            day = 1;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
    }
    format!("{day:02}/{month:02}/{year}")
}

fn main() -> anyhow::Result<()> {
    let output_path = env::args().nth(1).unwrap_or_else(|| "season-2324.csv".to_string());
    let mut rng = SimpleRng::new(42);

    // Double round-robin, ten matches per round, one round a week
    let mut fixtures: Vec<(usize, usize)> = Vec::new();
    for home in 0..TEAMS.len() {
        for away in 0..TEAMS.len() {
            if home != away {
                fixtures.push((home, away));
            }
        }
    }
    for i in (1..fixtures.len()).rev() {
        let j = rng.below(i + 1);
        fixtures.swap(i, j);
    }

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("Failed to create {output_path}"))?;

    for (n, &(home, away)) in fixtures.iter().enumerate() {
        let home_goals = rng.poisson(1.6);
        let away_goals = rng.poisson(1.25);
        let result = match home_goals.cmp(&away_goals) {
            std::cmp::Ordering::Greater => "H",
            std::cmp::Ordering::Less => "A",
            std::cmp::Ordering::Equal => "D",
        };
        // A handful of incomplete rows, as in real exports
        let home_goals = (!rng.chance(0.01)).then_some(home_goals);
        let away_goals = (!rng.chance(0.01)).then_some(away_goals);
        let referee = (!rng.chance(0.03)).then(|| REFEREES[rng.below(REFEREES.len())]);

        writer.serialize(MatchRecord {
            date: match_date((n / 10) as u32 * 7),
            home_team: TEAMS[home],
            away_team: TEAMS[away],
            home_goals,
            away_goals,
            result,
            referee,
            home_shots: 6 + rng.poisson(8.0),
            away_shots: 4 + rng.poisson(7.0),
            home_reds: u32::from(rng.chance(0.05)),
            away_reds: u32::from(rng.chance(0.06)),
        })?;
    }
    writer.flush()?;

    println!("Wrote {} matches to {output_path}", fixtures.len());
    Ok(())
}
