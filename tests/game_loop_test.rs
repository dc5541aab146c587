//! Timing behaviour of the game loop on the simulated host.

use tetris_loop::core::{run, Bootstrap, GameLoop, Host, LoopConfig, SimHost};
use tetris_loop::engine::{Engine, ProbeEngine};
use tetris_loop::types::{Command, Key};

fn host() -> SimHost {
    SimHost::ready().with_surface("tetris")
}

fn pump<E: Engine>(host: &mut SimHost, boot: &mut Bootstrap<E>, until_ms: u64) {
    host.run_until(until_ms);
    run(host, boot).unwrap();
}

fn game<E: Engine>(boot: &Bootstrap<E>) -> &GameLoop<E> {
    boot.game_loop().expect("loop should be running")
}

#[test]
fn gravity_advances_once_per_period_with_no_keys_held() {
    let mut host = host();
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    pump(&mut host, &mut boot, 999);
    assert_eq!(game(&boot).engine().advances(), 0);

    pump(&mut host, &mut boot, 1000);
    assert_eq!(game(&boot).engine().advances(), 1);

    pump(&mut host, &mut boot, 1999);
    assert_eq!(game(&boot).engine().advances(), 1);
    assert_eq!(game(&boot).engine().total(), 1);
}

#[test]
fn auto_repeat_keeps_a_single_drop_timer_until_release() {
    let mut host = host();
    host.key_down(100, Key::Down)
        .key_down(130, Key::Down)
        .key_up(500, Key::Down);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    pump(&mut host, &mut boot, 200);
    let drop_timer = game(&boot).input().drop_timer().expect("timer while held");
    assert!(host.is_interval_active(drop_timer));
    assert_eq!(host.intervals_created(), 2); // gravity + one drop timer
    assert_eq!(host.active_intervals(), 2);

    pump(&mut host, &mut boot, 600);
    assert!(game(&boot).input().drop_timer().is_none());
    assert!(!host.is_interval_active(drop_timer));
    assert_eq!(host.intervals_created(), 2);
    assert_eq!(host.active_intervals(), 1);
    assert_eq!(host.clear_calls(), 1);

    // two immediate drops + one throttled tick at 300ms
    assert_eq!(game(&boot).engine().advances(), 3);
}

#[test]
fn any_number_of_repeats_creates_exactly_one_drop_timer() {
    for repeats in 1..25u64 {
        let mut host = host();
        for i in 0..repeats {
            host.key_down(100 + i * 7, Key::Down);
        }
        let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

        pump(&mut host, &mut boot, 400);
        assert_eq!(host.intervals_created(), 2, "repeats = {repeats}");
        assert!(game(&boot).input().soft_drop_active());
    }
}

#[test]
fn gravity_is_suppressed_while_held_and_resumes_after_release() {
    let mut host = host();
    host.key_down(900, Key::Down).key_up(1500, Key::Down);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    // 900 press, 1000 gravity skipped, 1100 + 1300 throttled drops, 1500 release
    pump(&mut host, &mut boot, 1999);
    assert_eq!(game(&boot).engine().advances(), 3);

    pump(&mut host, &mut boot, 2000);
    assert_eq!(game(&boot).engine().advances(), 4);
}

#[test]
fn release_just_before_gravity_tick_lets_that_tick_advance() {
    let mut host = host();
    host.key_down(100, Key::Down).key_up(999, Key::Down);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    // press + drops at 300/500/700/900 + gravity at 1000
    pump(&mut host, &mut boot, 1000);
    assert_eq!(game(&boot).engine().advances(), 6);
}

#[test]
fn soft_drop_key_up_without_timer_is_a_no_op() {
    let mut host = host();
    host.key_up(10, Key::Down).key_up(20, Key::Down);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    pump(&mut host, &mut boot, 500);
    assert_eq!(host.clear_calls(), 0);
    assert_eq!(host.active_intervals(), 1);
    assert_eq!(game(&boot).engine().total(), 0);
}

#[test]
fn move_left_twice_issues_two_moves_and_no_timers() {
    let mut host = host();
    host.key_down(10, Key::Left).key_down(20, Key::Left);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    pump(&mut host, &mut boot, 50);
    assert_eq!(game(&boot).engine().count(Command::MoveLeft), 2);
    assert_eq!(host.intervals_created(), 1);
}

#[test]
fn rotations_and_moves_fire_once_per_key_down() {
    let mut host = host();
    host.key_down(10, Key::from_name("ArrowRight"))
        .key_down(20, Key::from_name("z"))
        .key_down(30, Key::from_name("x"))
        .key_down(40, Key::from_name("x"))
        .key_up(50, Key::from_name("x"));
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    pump(&mut host, &mut boot, 900);
    let engine = game(&boot).engine();
    assert_eq!(engine.count(Command::MoveRight), 1);
    assert_eq!(engine.count(Command::RotateLeft), 1);
    assert_eq!(engine.count(Command::RotateRight), 2);
    assert_eq!(engine.advances(), 0);
    assert_eq!(host.intervals_created(), 1);
}

#[test]
fn unknown_keys_have_no_effect() {
    let mut host = host();
    host.key_down(10, Key::Up)
        .key_up(20, Key::Up)
        .key_down(30, Key::Char('q'))
        .key_down(40, Key::Other);
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    pump(&mut host, &mut boot, 900);
    assert_eq!(game(&boot).engine().total(), 0);
    assert_eq!(host.intervals_created(), 1);
}

struct Banner {
    steps: u32,
}

impl Engine for Banner {
    fn render_frame(&self) -> String {
        format!("  ┌──┐\t\n  │{:>2}│  \n  └──┘\n\n", self.steps)
    }

    fn advance(&mut self) {
        self.steps += 1;
    }

    fn move_left(&mut self) {}

    fn move_right(&mut self) {}

    fn rotate_left(&mut self) {}

    fn rotate_right(&mut self) {}
}

#[test]
fn rendered_text_reaches_the_surface_unmodified() {
    let mut host = host();
    let mut boot = Bootstrap::new(Banner { steps: 0 }, LoopConfig::default());

    boot.begin(&mut host).unwrap();
    assert_eq!(host.surface_text("tetris"), Some("  ┌──┐\t\n  │ 0│  \n  └──┘\n\n"));

    // gravity at 1000, next frame at 1008
    pump(&mut host, &mut boot, 1010);
    let expected = game(&boot).engine().render_frame();
    assert_eq!(expected, "  ┌──┐\t\n  │ 1│  \n  └──┘\n\n");
    assert_eq!(host.surface_text("tetris"), Some(expected.as_str()));
}

#[test]
fn render_cadence_follows_host_frame_pacing() {
    let mut host = host();
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    pump(&mut host, &mut boot, 160);
    assert_eq!(game(&boot).frames_rendered(), 10);

    // Host throttles frames (e.g. backgrounded); the pending 176ms frame
    // still fires, later ones come every 100ms.
    host.set_frame_interval_ms(100);
    pump(&mut host, &mut boot, 576);
    assert_eq!(game(&boot).frames_rendered(), 15);
    assert_eq!(host.frames_delivered(), 15);
    assert_eq!(host.surface_writes("tetris"), 16);

    // Gravity is independent of frame pacing.
    pump(&mut host, &mut boot, 1000);
    assert_eq!(game(&boot).engine().advances(), 1);
}

#[test]
fn gravity_keeps_firing_indefinitely() {
    let mut host = host();
    let mut boot = Bootstrap::new(ProbeEngine::new(), LoopConfig::default());

    pump(&mut host, &mut boot, 60_000);
    assert_eq!(game(&boot).engine().advances(), 60);
    assert!(host.is_interval_active(game(&boot).gravity_timer()));
    assert!(host.is_ready());
}
