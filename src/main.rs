use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use rs_arm_kinematics::kinematic_traits::{
    Elbow, Joints2R, Joints3R, JointsPolar, Kinematics, Position, Position2,
};
use rs_arm_kinematics::kinematics_impl::ThreeRKinematics;
use rs_arm_kinematics::parameters::arm_kinematics::SimulatorConfig;
use rs_arm_kinematics::planar::PlanarKinematics;
use rs_arm_kinematics::polar::PolarKinematics;
use rs_arm_kinematics::session::{RobotType, Session};
use rs_arm_kinematics::utils::{
    dump_joints_2r, dump_joints_3r, dump_joints_polar, dump_position, dump_position_2,
    to_display_mm,
};

/// Forward and inverse kinematics of the simulated arms from the command line.
/// Angles are degrees, lengths meters.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// YAML file with the simulator configuration; defaults are used without it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Arm {
    #[value(name = "3r")]
    ThreeR,
    Polar,
}

#[derive(Subcommand)]
enum Command {
    /// Tip of the 3R arm for yaw, shoulder and elbow angles
    Fk3r {
        #[arg(allow_negative_numbers = true)]
        q1: f64,
        #[arg(allow_negative_numbers = true)]
        q2: f64,
        #[arg(allow_negative_numbers = true)]
        q3: f64,
    },
    /// Joints of the 3R arm reaching x, y, z
    Ik3r {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        /// Preferred elbow sign, 1 or -1
        #[arg(long, allow_negative_numbers = true)]
        elbow: Option<i32>,
    },
    /// Tip of the polar arm for theta, phi (degrees) and rho (meters)
    FkPolar {
        #[arg(allow_negative_numbers = true)]
        theta: f64,
        #[arg(allow_negative_numbers = true)]
        phi: f64,
        rho: f64,
    },
    /// Joints of the polar arm reaching x, y, z
    IkPolar {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
    },
    /// Tip of the planar arm
    Fk2r {
        #[arg(allow_negative_numbers = true)]
        q1: f64,
        #[arg(allow_negative_numbers = true)]
        q2: f64,
    },
    /// Joints of the planar arm reaching x, y
    Ik2r {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Elbow sign, 1 or -1
        #[arg(long, allow_negative_numbers = true)]
        elbow: Option<i32>,
    },
    /// Animate the configured arm to the opposite side and print the frames
    Animate {
        #[arg(long, value_enum, default_value = "3r")]
        arm: Arm,
        /// Move the joints rather than only the target marker
        #[arg(long)]
        joints: bool,
        /// Time between printed frames, milliseconds
        #[arg(long, default_value_t = 100.0)]
        step_ms: f64,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn elbow_from(sign: Option<i32>, default: Elbow) -> Result<Elbow> {
    match sign {
        None => Ok(default),
        Some(1) => Ok(Elbow::Positive),
        Some(-1) => Ok(Elbow::Negative),
        Some(other) => anyhow::bail!("elbow must be 1 or -1, not {}", other),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SimulatorConfig> {
    match path {
        Some(path) => SimulatorConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(SimulatorConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Fk3r { q1, q2, q3 } => {
            let robot = ThreeRKinematics::with_preferred_elbow(config.arm_3r, config.elbow_3r);
            dump_position(&robot.forward(&Joints3R::from_degrees(q1, q2, q3)));
        }
        Command::Ik3r { x, y, z, elbow } => {
            let robot = ThreeRKinematics::with_preferred_elbow(
                config.arm_3r, elbow_from(elbow, config.elbow_3r)?);
            let solution = robot.inverse(&Position::new(x, y, z)).context("No 3R solution")?;
            dump_joints_3r(&solution.joints);
            println!("elbow {}, elbow height {} mm", solution.elbow, to_display_mm(solution.y_elbow));
        }
        Command::FkPolar { theta, phi, rho } => {
            let robot = PolarKinematics::new(config.polar);
            let joints = robot.limit(&JointsPolar::from_degrees(theta, phi, rho));
            dump_position(&robot.forward(&joints));
        }
        Command::IkPolar { x, y, z } => {
            let robot = PolarKinematics::new(config.polar);
            let solution = robot.inverse(&Position::new(x, y, z)).context("No polar solution")?;
            dump_joints_polar(&solution.joints);
        }
        Command::Fk2r { q1, q2 } => {
            let robot = PlanarKinematics::new(config.arm_2r, config.elbow_2r);
            dump_position_2(&robot.forward(&Joints2R::from_degrees(q1, q2)));
        }
        Command::Ik2r { x, y, elbow } => {
            let robot = PlanarKinematics::new(config.arm_2r, elbow_from(elbow, config.elbow_2r)?);
            let solution = robot.inverse(&Position2::new(x, y)).context("No 2R solution")?;
            dump_joints_2r(&solution.joints);
        }
        Command::Animate { arm, joints, step_ms } => {
            anyhow::ensure!(step_ms > 0.0, "step must be positive");
            let mut session = Session::new(&config)?;
            if matches!(arm, Arm::Polar) {
                session.toggle_robot_type()?;
            }
            if joints {
                session.animate_joints_to_opposite(0.0)?;
            } else {
                session.animate_to_opposite(0.0)?;
            }
            let mut now = 0.0;
            loop {
                let running = session.tick(now);
                print!("{:7.1} ms  ", now);
                match session.robot_type() {
                    RobotType::ThreeR if joints => dump_joints_3r(&session.joints_3r()),
                    RobotType::Polar if joints => dump_joints_polar(&session.joints_polar()),
                    _ => dump_position(&session.target()),
                }
                if !running {
                    break;
                }
                now += step_ms;
            }
        }
        Command::Config => {
            print!("{}", config.to_yaml());
        }
    }
    Ok(())
}
