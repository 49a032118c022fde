use itertools::Itertools;

use crate::generator::Generator;

fn sanitize_dot_ident(name: &str) -> String {
    name.chars()
        .filter_map(|chr| match chr {
            c if c.is_alphanumeric() => Some(c),
            '|' => Some('_'),
            '(' | ')' | '[' | ']' => None,
            ':' | ',' | '.' => Some('_'),
            w if w.is_whitespace() => None,
            _ => Some('_'),
        })
        .join("")
}

impl Generator {
    /// Compute the graphviz representation of the generator, for more information on
    /// the DOT format, see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    ///
    /// Marked states are drawn as double circles, initial states get an entry arrow
    /// and transitions on uncontrollable events are dashed.
    pub fn dot_representation(&self) -> String {
        let name = if self.name().is_empty() {
            "G".to_string()
        } else {
            sanitize_dot_ident(self.name())
        };
        let header = std::iter::once(format!("digraph {name} {{"))
            .chain(std::iter::once("rankdir=LR".to_string()));

        let states = self.states().map(|q| {
            let shape = if self.exists_marked_state(q) {
                "doublecircle"
            } else {
                "circle"
            };
            format!(
                "{} [shape={}, label=\"{}\"]",
                sanitize_dot_ident(&self.state_label(q)),
                shape,
                self.state_label(q)
            )
        });

        let entries = self.init_states().enumerate().flat_map(|(i, q)| {
            [
                format!("init{i} [shape=none, label=\"\"]"),
                format!("init{i} -> {}", sanitize_dot_ident(&self.state_label(q))),
            ]
        });

        let transitions = self.transitions().map(|t| {
            let style = if self.alphabet().is_controllable(t.ev.name()) {
                ""
            } else {
                ", style=dashed"
            };
            format!(
                "{} -> {} [label=\"{}\"{}]",
                sanitize_dot_ident(&self.state_label(t.x1)),
                sanitize_dot_ident(&self.state_label(t.x2)),
                t.ev,
                style
            )
        });

        let mut lines = header
            .chain(states)
            .chain(entries)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()));
        lines.join("\n")
    }

    /// Renders the generator visually (as PNG) and returns the bytes of the encoded
    /// image. This method is only available on the `graphviz` crate feature and
    /// requires the `dot` binary to be installed.
    #[cfg(feature = "graphviz")]
    pub fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        use std::io::{Read, Write};

        use tracing::trace;
        let dot = self.dot_representation();
        trace!("writing dot representation\n{}", dot);

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(dot.as_bytes())?;
        }

        let mut output = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout.read_to_end(&mut output)?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("dot process exited with status: {}", status),
            ));
        }

        Ok(output)
    }

    /// Attempts to render the generator to a PNG file with the given filename. Only
    /// available on the `graphviz` crate feature; uses a temporary file for the
    /// intermediate DOT source.
    #[cfg(feature = "graphviz")]
    pub fn render_to_file_name(&self, filename: &str) -> Result<(), std::io::Error> {
        use std::io::Write;

        let dot = self.dot_representation();
        let mut tempfile = tempfile::NamedTempFile::new()?;
        tempfile.write_all(dot.as_bytes())?;

        let mut child = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(filename)
            .arg(tempfile.path())
            .spawn()?;
        if !child.wait()?.success() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "dot exited with failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn dot_output_structure() {
        let gen = Generator::builder()
            .named("machine")
            .with_controllable_events(["alpha"])
            .with_transitions([("Idle", "alpha", "Busy"), ("Busy", "beta", "Idle")])
            .with_initial("Idle")
            .with_marked(["Idle"])
            .build();

        let dot = gen.dot_representation();
        assert!(dot.starts_with("digraph machine {"));
        assert!(dot.contains("Idle [shape=doublecircle"));
        assert!(dot.contains("Busy [shape=circle"));
        assert!(dot.contains("init0 -> Idle"));
        assert!(dot.contains("Idle -> Busy [label=\"alpha\"]"));
        // uncontrollable events are dashed
        assert!(dot.contains("Busy -> Idle [label=\"beta\", style=dashed]"));
        assert!(dot.ends_with('}'));
    }
}
