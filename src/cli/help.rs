//! Topic help for the reflector: shapes, configuration and usage examples

use crate::config::env::EnvManager;
use crate::types::DistributionShape;
use colored::*;

/// Help text renderer for `--help-topic`
pub struct HelpSystem {
    version: &'static str,
}

impl HelpSystem {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Display the main help message
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_options_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_shapes_help(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));

        help
    }

    /// Display help for a single topic
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "shapes" | "shape" | "distribution" => Some(self.format_shapes_help(use_colors)),
            "config" | "configuration" | "env" | "environment" => Some(self.format_configuration_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "Variable Reflector";
        let subtitle = "HTTP echo server with synthetic, configurable latency";

        if use_colors {
            format!("{}\n{}\nVersion: {}\n", title.bright_cyan().bold(), subtitle.bright_blue(), self.version.green())
        } else {
            format!("{}\n{}\nVersion: {}\n", title, subtitle, self.version)
        }
    }

    fn format_usage_section(&self, use_colors: bool) -> String {
        let mut usage = format!("{}\n", section_header("USAGE:", use_colors));
        for pattern in ["reflector [OPTIONS]", "reflector --help-topic <TOPIC>", "reflector-spam [OPTIONS]"] {
            if use_colors {
                usage.push_str(&format!("  {}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("  {}\n", pattern));
            }
        }
        usage
    }

    fn format_options_section(&self, use_colors: bool) -> String {
        let options = [
            OptionHelp {
                short: Some("i"),
                long: "listen-port",
                value: "<ADDR>",
                description: "Bind address; a bare port binds to 127.0.0.1",
                example: Some("-i :8880"),
            },
            OptionHelp {
                short: Some("l"),
                long: "min-latency",
                value: "<SECONDS>",
                description: "Lower latency bound (sign is ignored)",
                example: Some("-l 0.2"),
            },
            OptionHelp {
                short: Some("x"),
                long: "max-latency",
                value: "<SECONDS>",
                description: "Upper latency bound (sign is ignored)",
                example: Some("-x 2.5"),
            },
            OptionHelp {
                short: Some("g"),
                long: "shape",
                value: "<u|m|l|x>",
                description: "Delay distribution shape (alias --gausian)",
                example: Some("-g l"),
            },
            OptionHelp {
                short: None,
                long: "passthrough",
                value: "",
                description: "Echo immediately without any delay",
                example: None,
            },
            OptionHelp {
                short: None,
                long: "seed",
                value: "<N>",
                description: "Reproducible delay sequence (not with --passthrough)",
                example: Some("--seed 42"),
            },
            OptionHelp {
                short: None,
                long: "log-format",
                value: "<FORMAT>",
                description: "console, json or compact",
                example: None,
            },
        ];

        let mut output = format!("{}\n", section_header("OPTIONS:", use_colors));
        for option in options {
            output.push_str(&option.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_shapes_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", section_header("DISTRIBUTION SHAPES:", use_colors));

        for shape in DistributionShape::ALL {
            let description = match shape {
                DistributionShape::Uniform => "every value in [min, max] equally likely, millisecond resolution",
                DistributionShape::Symmetric => "normal around the mid-range; may exceed max, floored at 0",
                DistributionShape::RightSkewed => "log-normal favouring low latency with a long tail toward max",
                DistributionShape::LeftSkewed => "mirror of right-skewed, favouring high latency",
            };
            let token = format!("{} ({})", shape.token(), shape.name());
            if use_colors {
                help.push_str(&format!("  {:<18} {}\n", token.bright_cyan(), description));
            } else {
                help.push_str(&format!("  {:<18} {}\n", token, description));
            }
        }

        help.push_str("\nAn inverted range (min > max) is swapped with a startup warning.\n");
        help
    }

    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n", section_header("CONFIGURATION:", use_colors));
        help.push_str("Priority: CLI arguments > environment variables > .env file > defaults\n\n");

        for (var_name, description, example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                help.push_str(&format!("  {}: {}\n", var_name.bright_yellow().bold(), description));
                help.push_str(&format!("      e.g. {}\n", example.bright_blue()));
            } else {
                help.push_str(&format!("  {}: {}\n", var_name, description));
                help.push_str(&format!("      e.g. {}\n", example));
            }
        }

        help
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Fixed one-second backend",
                command: "reflector -l 1 -x 1",
                description: "Every response is held for exactly one second",
            },
            ExampleHelp {
                title: "Mostly fast with a slow tail",
                command: "reflector -i :8880 -l 0.05 -x 3 -g l",
                description: "Right-skewed delays between 50ms and 3s",
            },
            ExampleHelp {
                title: "Reproducible run",
                command: "reflector -x 2 -g m --seed 7 --log-format json",
                description: "Same delay sequence on every start, JSON logs",
            },
            ExampleHelp {
                title: "Drive the server",
                command: "reflector-spam -t http://127.0.0.1:8880 -c 20",
                description: "Twenty sequential requests followed by a latency summary",
            },
        ];

        let mut output = format!("{}\n", section_header("EXAMPLES:", use_colors));
        for example in examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }
        output
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn section_header(title: &str, use_colors: bool) -> String {
    if use_colors {
        title.bright_green().bold().to_string()
    } else {
        title.to_string()
    }
}

struct OptionHelp {
    short: Option<&'static str>,
    long: &'static str,
    value: &'static str,
    description: &'static str,
    example: Option<&'static str>,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let mut option_str = String::new();

        match self.short {
            Some(short) if use_colors => option_str.push_str(&format!("  {}, ", format!("-{}", short).bright_cyan())),
            Some(short) => option_str.push_str(&format!("  -{}, ", short)),
            None => option_str.push_str("      "),
        }

        let long_with_value = if self.value.is_empty() {
            format!("--{}", self.long)
        } else {
            format!("--{} {}", self.long, self.value)
        };

        if use_colors {
            option_str.push_str(&format!("{:<28} {}", long_with_value.bright_cyan(), self.description));
        } else {
            option_str.push_str(&format!("{:<28} {}", long_with_value, self.description));
        }

        if let Some(example) = self.example {
            let line = format!("Example: {}", example);
            if use_colors {
                option_str.push_str(&format!("\n{}{}", " ".repeat(35), line.bright_blue().italic()));
            } else {
                option_str.push_str(&format!("\n{}{}", " ".repeat(35), line));
            }
        }

        option_str
    }
}

struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!("  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n", self.title, self.command, self.description)
        }
    }
}
