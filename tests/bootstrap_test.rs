//! Start-once behaviour of the bootstrap.

use std::time::Duration;

use tetris_loop::core::{run, Bootstrap, LoopConfig, SimHost};
use tetris_loop::engine::ProbeEngine;
use tetris_loop::types::{Command, Key};

#[test]
fn ready_host_starts_synchronously_inside_begin() {
    let mut host = SimHost::ready().with_surface("tetris");
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    boot.begin(&mut host).unwrap();
    assert!(boot.is_running());
    assert_eq!(host.now_ms(), 0);
    assert_eq!(host.surface_writes("tetris"), 1);
    assert_eq!(host.intervals_created(), 1);
    assert!(host.frame_pending());
}

#[test]
fn host_not_yet_ready_starts_when_signal_fires() {
    let mut host = SimHost::new().with_surface("tetris");
    host.signal_ready(50);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    host.run_until(49);
    run(&mut host, &mut boot).unwrap();
    assert!(!boot.is_running());
    assert_eq!(host.intervals_created(), 0);
    assert_eq!(host.surface_writes("tetris"), 0);

    host.run_until(100);
    run(&mut host, &mut boot).unwrap();
    assert!(boot.is_running());
    assert_eq!(host.intervals_created(), 1);
}

#[test]
fn repeated_readiness_signals_start_only_once() {
    let mut host = SimHost::new().with_surface("tetris");
    host.signal_ready(10).signal_ready(10).signal_ready(300);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    host.run_until(1000);
    run(&mut host, &mut boot).unwrap();

    assert_eq!(host.intervals_created(), 1);
    // Gravity period counts from the single start at 10ms.
    assert_eq!(boot.game_loop().unwrap().engine().advances(), 0);

    host.run_until(1010);
    run(&mut host, &mut boot).unwrap();
    assert_eq!(boot.game_loop().unwrap().engine().advances(), 1);
}

#[test]
fn keys_before_start_are_dropped() {
    let mut host = SimHost::new().with_surface("tetris");
    host.key_down(10, Key::Left)
        .key_down(20, Key::Down)
        .key_up(30, Key::Down)
        .signal_ready(50)
        .key_down(60, Key::Left);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    host.run_until(100);
    run(&mut host, &mut boot).unwrap();

    let engine = boot.game_loop().unwrap().engine();
    assert_eq!(engine.count(Command::MoveLeft), 1);
    assert_eq!(engine.advances(), 0);
    assert_eq!(host.intervals_created(), 1);
    assert_eq!(host.clear_calls(), 0);
}

#[test]
fn missing_surface_fails_loudly_at_start() {
    let mut host = SimHost::new().with_surface("board");
    host.signal_ready(5);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    host.run_until(100);
    let err = run(&mut host, &mut boot).unwrap_err();
    assert!(err.to_string().contains("render surface `tetris` not found"));
    assert!(!boot.is_running());
    assert_eq!(host.intervals_created(), 0);
}

#[test]
fn configured_periods_and_surface_are_used() {
    let mut host = SimHost::ready().with_surface("board");
    host.key_down(1000, Key::Down).key_up(1100, Key::Down);
    let config = LoopConfig {
        gravity_period: Duration::from_millis(250),
        drop_throttle: Duration::from_millis(40),
        surface_id: "board".to_string(),
        ..LoopConfig::default()
    };
    let mut boot = Bootstrap::new(ProbeEngine::new(), config);

    host.run_until(1100);
    run(&mut host, &mut boot).unwrap();

    // gravity at 250/500/750 (1000 ties with the press, which wins and suppresses it),
    // press at 1000, drops at 1040/1080, release at 1100
    assert_eq!(boot.game_loop().unwrap().engine().advances(), 6);
    assert!(host.surface_text("board").is_some());
}
