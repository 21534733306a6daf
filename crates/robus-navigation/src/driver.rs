/// Core trait defining the interface to the motion driver below the tracker.
///
/// The driver owns the motors and the odometry sensing. The tracker only
/// reads its kinematic estimate and hands it velocity commands.
pub trait MotionDriver {
    type Error;

    /// Current linear velocity along the robot's heading
    fn velocity(&self) -> Result<f64, Self::Error>;

    /// Current angular velocity in rad/s, counter-clockwise positive
    fn angular_velocity(&self) -> Result<f64, Self::Error>;

    /// Current heading estimate in radians
    fn compute_orientation(&self) -> Result<f64, Self::Error>;

    /// Command a new linear velocity
    fn set_velocity(&mut self, velocity: f64) -> Result<(), Self::Error>;

    /// Command a new angular velocity
    fn set_angular_velocity(&mut self, angular_velocity: f64) -> Result<(), Self::Error>;

    /// Zero all motion immediately
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// Advance the driver's own internal state.
    /// Called once per tracker tick, after steering commands are applied.
    fn update(&mut self) -> Result<(), Self::Error>;
}
