use robot_sim::error::SimError;
use robot_sim::robot::{
    CameraResolution, Chassis, GyroAxis, RobotConfig, SensorKind, SensorSettings,
};

#[test]
fn default_robot_is_a_bare_rover() {
    let robot = RobotConfig::default();
    assert_eq!(robot.chassis, Chassis::Rover);
    assert!(robot.sensors.is_empty());
    let stats = robot.stats();
    assert_eq!((stats.total_power, stats.total_weight), (20, 500));
}

#[test]
fn toggling_a_sensor_fits_it_with_defaults() {
    let mut robot = RobotConfig::default();
    robot.toggle_sensor(SensorKind::Ultrasonic);
    robot.toggle_sensor(SensorKind::Camera);

    assert_eq!(robot.sensors, vec![SensorKind::Ultrasonic, SensorKind::Camera]);
    assert_eq!(
        robot.settings(SensorKind::Ultrasonic),
        Some(SensorSettings::Ultrasonic { range_cm: 200 })
    );
    assert_eq!(
        robot.settings(SensorKind::Camera),
        Some(SensorSettings::Camera {
            resolution: CameraResolution::Hd720
        })
    );

    let stats = robot.stats();
    assert_eq!((stats.total_power, stats.total_weight), (40, 535));
}

#[test]
fn settings_survive_removal_and_refit() {
    let mut robot = RobotConfig::default();
    robot.toggle_sensor(SensorKind::Gyro);
    robot
        .update_sensor(
            SensorKind::Gyro,
            SensorSettings::Gyro {
                axis: GyroAxis::SixAxis,
            },
        )
        .unwrap();

    robot.toggle_sensor(SensorKind::Gyro);
    assert!(!robot.has_sensor(SensorKind::Gyro));
    assert_eq!(robot.settings(SensorKind::Gyro), None);

    robot.toggle_sensor(SensorKind::Gyro);
    assert_eq!(
        robot.settings(SensorKind::Gyro),
        Some(SensorSettings::Gyro {
            axis: GyroAxis::SixAxis
        })
    );
}

#[test]
fn update_rejects_mismatched_settings_and_clamps_values() {
    let mut robot = RobotConfig::default();
    robot.toggle_sensor(SensorKind::Infrared);

    let err = robot
        .update_sensor(SensorKind::Infrared, SensorSettings::Color { illumination: false })
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig { .. }));

    robot
        .update_sensor(SensorKind::Infrared, SensorSettings::Infrared { sensitivity: 180 })
        .unwrap();
    assert_eq!(
        robot.settings(SensorKind::Infrared),
        Some(SensorSettings::Infrared { sensitivity: 100 })
    );
}

#[test]
fn every_sensor_fitted_adds_up() {
    let mut robot = RobotConfig::default();
    for kind in SensorKind::ALL {
        robot.toggle_sensor(kind);
    }
    let stats = robot.stats();
    assert_eq!(stats.total_power, 20 + 5 + 3 + 4 + 2 + 15);
    assert_eq!(stats.total_weight, 500 + 10 + 5 + 8 + 5 + 25);
}

#[test]
fn save_and_load_preserve_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("robot.json");

    let mut robot = RobotConfig {
        name: "Scout".into(),
        chassis: Chassis::Drone,
        ..RobotConfig::default()
    };
    robot.toggle_sensor(SensorKind::Color);
    robot.save(&path).unwrap();

    assert_eq!(RobotConfig::load(&path).unwrap(), robot);
}

#[test]
fn loads_records_using_type_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("robot.json");
    std::fs::write(
        &path,
        r#"{
            "name": "Arm-2",
            "type": "arm",
            "sensors": ["ultrasonic"],
            "sensor_config": {"ultrasonic": {"range": 300}}
        }"#,
    )
    .unwrap();

    let robot = RobotConfig::load(&path).unwrap();
    assert_eq!(robot.chassis, Chassis::Arm);
    assert_eq!(
        robot.settings(SensorKind::Ultrasonic),
        Some(SensorSettings::Ultrasonic { range_cm: 300 })
    );
}

#[test]
fn load_rejects_settings_filed_under_the_wrong_sensor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("robot.json");
    std::fs::write(
        &path,
        r#"{"name": "X", "sensor_config": {"gyro": {"sensitivity": 10}}}"#,
    )
    .unwrap();
    assert!(matches!(
        RobotConfig::load(&path),
        Err(SimError::InvalidConfig { .. })
    ));
}
