use core::num::NonZeroU32;
use robus_kinematics::*;

fn main() {
    let twist = Twist::new(1.0, 0.8); // 1.0 unit/s forward, 0.8 rad/s turning
    let dt = 0.1; // Tick length in seconds
    let num_steps = 10;

    println!("Integrating the same arc with different sub-step counts...");
    println!("  Twist:     {}", twist);
    println!("  Tick:      {} s x {}", dt, num_steps);

    for n in [1u32, 4, 16] {
        let Some(substeps) = NonZeroU32::new(n) else {
            continue;
        };
        let integrator = Integrator::new(substeps);
        let mut position = Point::ORIGIN;
        let mut heading = 0.0;

        for i in 0..num_steps {
            match integrator.step(position, twist, heading, dt) {
                Ok(next) => {
                    position = next;
                    heading = normalize_angle(heading + twist.wz * dt);
                }
                Err(e) => {
                    eprintln!("Error during step {}: {}", i + 1, e);
                    break;
                }
            }
        }

        println!("{}: final position {}, heading {:.3} rad", integrator, position, heading);
    }
}
