use std::fmt;

use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::generator::Generator;

impl fmt::Display for Generator {
    /// A stable textual listing of the generator: alphabet, states, transitions,
    /// initial and marked sets. Everything is emitted in sorted order, so dumps are
    /// reproducible across runs and usable for golden-file comparisons.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generator \"{}\"", self.name())?;
        writeln!(f, "Alphabet: {}", self.alphabet())?;
        writeln!(
            f,
            "States: {{{}}}",
            self.states().map(|q| self.state_label(q)).join(" ")
        )?;
        writeln!(f, "Transitions:")?;
        for t in self.transitions() {
            writeln!(
                f,
                "  {} --{}--> {}",
                self.state_label(t.x1),
                t.ev,
                self.state_label(t.x2)
            )?;
        }
        writeln!(
            f,
            "Initial: {{{}}}",
            self.init_states().map(|q| self.state_label(q)).join(" ")
        )?;
        write!(
            f,
            "Marked: {{{}}}",
            self.marked_states().map(|q| self.state_label(q)).join(" ")
        )
    }
}

impl Generator {
    /// Returns a string representation of the transition table of the generator: one
    /// row per state, one column per alphabet event. Initial states are prefixed with
    /// an arrow, marked states are highlighted.
    pub fn transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.alphabet().iter().map(|ev| ev.to_string())),
        );
        for q in self.states() {
            let mut label = self.state_label(q);
            if self.exists_marked_state(q) {
                label = label.green().bold().to_string();
            }
            if self.exists_init_state(q) {
                label = format!("-> {label}");
            }
            let mut row = vec![label];
            for ev in self.alphabet() {
                let targets = self
                    .transitions_from(q)
                    .filter(|(e, _)| e == ev)
                    .map(|(_, x2)| self.state_label(*x2))
                    .join(", ");
                row.push(if targets.is_empty() {
                    "-".to_string()
                } else {
                    targets
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn display_is_deterministic() {
        let gen = Generator::builder()
            .named("machine")
            .with_controllable_events(["alpha"])
            .with_transitions([("Idle", "alpha", "Busy"), ("Busy", "beta", "Idle")])
            .with_initial("Idle")
            .with_marked(["Idle"])
            .build();

        let dump = gen.to_string();
        assert_eq!(dump, gen.to_string());
        assert!(dump.contains("Generator \"machine\""));
        assert!(dump.contains("alpha+C"));
        assert!(dump.contains("Idle --alpha--> Busy"));
        assert!(dump.contains("Marked: {Idle}"));
    }

    #[test]
    fn table_mentions_all_states() {
        let gen = Generator::builder()
            .with_transitions([("Idle", "alpha", "Busy"), ("Busy", "beta", "Idle")])
            .with_initial("Idle")
            .build();
        let table = gen.transition_table();
        assert!(table.contains("Idle"));
        assert!(table.contains("Busy"));
        assert!(table.contains("alpha"));
    }
}
