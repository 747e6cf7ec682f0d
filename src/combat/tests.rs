//! Combat domain: unit tests for damage rules, the service and enemy motors.

use bevy::prelude::*;

use super::{
    CombatService, CombatStats, Combatant, DamageOutcome, EnemyCombat, EnemyMotor, HitStun,
    MotorSense, MotorTuning, PlayerCombat, Vitals, apply_damage, knockback_vector,
    tick_invincibility,
};

fn stats(max_health: i32) -> CombatStats {
    CombatStats {
        max_health,
        invincibility_secs: 0.25,
        base_damage: 1,
        base_knockback: Vec2::new(5.0, 1.0),
    }
}

#[test]
fn test_damage_until_death() {
    let stats = stats(2);
    let mut vitals = Vitals::new(&stats);

    assert_eq!(
        apply_damage(&mut vitals, 1),
        DamageOutcome::Hurt { remaining: 1 }
    );
    assert_eq!(apply_damage(&mut vitals, 1), DamageOutcome::Killed);
    assert!(!vitals.alive);
    assert_eq!(apply_damage(&mut vitals, 1), DamageOutcome::Ignored);
}

#[test]
fn test_invincibility_blocks_damage_then_expires() {
    let stats = stats(5);
    let mut vitals = Vitals::new(&stats);
    vitals.start_invincibility();

    assert_eq!(apply_damage(&mut vitals, 1), DamageOutcome::Ignored);
    assert_eq!(vitals.health, 5);

    for _ in 0..20 {
        tick_invincibility(&mut vitals, &stats, 0.02);
    }
    assert!(!vitals.invincible);
    assert_eq!(
        apply_damage(&mut vitals, 1),
        DamageOutcome::Hurt { remaining: 4 }
    );
}

#[test]
fn test_knockback_pushes_away_from_source() {
    let base = Vec2::new(5.0, 1.0);

    // Source on the right pushes left
    assert_eq!(
        knockback_vector(base, Vec2::new(3.0, 0.0), Vec2::ZERO),
        Vec2::new(-5.0, 1.0)
    );
    assert_eq!(
        knockback_vector(base, Vec2::new(-3.0, 4.0), Vec2::ZERO),
        Vec2::new(5.0, 1.0)
    );
    // Straight above counts as the right side
    assert_eq!(
        knockback_vector(base, Vec2::new(0.0, 2.0), Vec2::ZERO),
        Vec2::new(-5.0, 1.0)
    );
}

#[test]
fn test_take_attack_starts_invincibility() {
    let mut player = PlayerCombat::new(stats(3));

    let first = player.take_attack(1, Vec2::new(5.0, 1.0), Vec2::new(-1.0, 0.0), Vec2::ZERO);
    assert_eq!(first.damage, DamageOutcome::Hurt { remaining: 2 });
    assert_eq!(first.knockback, Some(Vec2::new(5.0, 1.0)));
    assert!(player.vitals().invincible);

    // The follow-up lands inside the invincibility window
    let second = player.take_attack(1, Vec2::new(5.0, 1.0), Vec2::new(-1.0, 0.0), Vec2::ZERO);
    assert_eq!(second.damage, DamageOutcome::Ignored);
    assert_eq!(second.knockback, None);
    assert_eq!(player.vitals().health, 2);
}

#[test]
fn test_killing_blow_has_no_knockback() {
    let mut enemy = EnemyCombat::new(stats(1));

    let outcome = enemy.take_attack(3, Vec2::new(5.0, 1.0), Vec2::ZERO, Vec2::X);
    assert_eq!(outcome.damage, DamageOutcome::Killed);
    assert_eq!(outcome.knockback, None);
}

#[test]
fn test_service_counts_attacks() {
    let mut service = CombatService::default();
    let mut enemy = EnemyCombat::new(stats(4));

    let outcome = service.deal_attack(&mut enemy, 2, Vec2::new(5.0, 1.0), Vec2::ZERO, Vec2::X);
    assert_eq!(outcome.damage, DamageOutcome::Hurt { remaining: 2 });
    assert_eq!(outcome.knockback, Some(Vec2::new(5.0, 1.0)));
    assert_eq!(service.attacks_dealt(), 1);
}

fn motor() -> EnemyMotor {
    EnemyMotor::new(
        MotorTuning {
            walk_speed: 2.0,
            deceleration: 4.0,
            attack_cooldown_secs: 1.0,
            attack_size: Vec2::new(1.5, 1.0),
            ..default()
        },
        0.75,
    )
}

#[test]
fn test_motor_turns_only_at_wall_ahead() {
    let mut motor = motor();
    let mut sense = MotorSense::default();

    assert_eq!(motor.step(&sense, 0.02), 2.0);

    // Wall behind: keep walking
    sense.wall_side = -1;
    assert_eq!(motor.step(&sense, 0.02), 2.0);

    sense.wall_side = 1;
    assert_eq!(motor.step(&sense, 0.02), -2.0);
    assert!(motor.facing_left());
}

#[test]
fn test_motor_tracks_player_through_walls() {
    let mut motor = motor();
    let sense = MotorSense {
        position: Vec2::ZERO,
        wall_side: 1,
        player: Some(Vec2::new(4.0, 0.0)),
    };

    assert_eq!(motor.step(&sense, 0.02), 2.0);
    assert!(motor.is_tracking());
}

#[test]
fn test_motor_knockback_restores_control_after_timeout() {
    let mut motor = motor();
    let sense = MotorSense::default();

    motor.apply_knockback(Vec2::new(-5.0, 1.0));
    assert!(!motor.has_control());
    assert_eq!(motor.take_lift(), Some(1.0));
    assert_eq!(motor.take_lift(), None);

    let first = motor.step(&sense, 0.1);
    assert!((first - -4.6).abs() < 1e-5);

    let mut steps = 1;
    while !motor.has_control() {
        motor.step(&sense, 0.1);
        steps += 1;
        assert!(steps < 20, "control never returned");
    }
    // 0.75 s of disable at 0.1 s per step
    assert_eq!(steps, 9);
}

#[test]
fn test_motor_attack_cooldown() {
    let mut motor = motor();
    let sense = MotorSense {
        position: Vec2::ZERO,
        wall_side: 0,
        player: Some(Vec2::new(1.0, 0.5)),
    };
    motor.step(&sense, 0.02);

    assert!(motor.try_attack(Vec2::ZERO));
    assert!(!motor.try_attack(Vec2::ZERO));

    for _ in 0..60 {
        motor.step(&sense, 0.02);
    }
    assert!(motor.try_attack(Vec2::ZERO));
}

#[test]
fn test_motor_ignores_player_outside_attack_box() {
    let mut motor = motor();
    let sense = MotorSense {
        position: Vec2::ZERO,
        wall_side: 0,
        player: Some(Vec2::new(3.0, 0.0)),
    };
    motor.step(&sense, 0.02);

    assert!(!motor.try_attack(Vec2::ZERO));
}

#[test]
fn test_hit_stun_runs_out() {
    let mut stun = HitStun::new(0.1);
    assert!(!stun.tick(0.06));
    assert!(stun.tick(0.06));
}
