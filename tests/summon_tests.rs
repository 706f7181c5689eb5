use gacha_arena::engine::{
    draw_template, materialize, Element, ScalingStat, SkillTemplate, StatBlock, SummonTemplate,
};
use gacha_arena::error::EngineError;
use rand::SeedableRng;
use rand_pcg::Lcg64Xsh32;

fn rng(seed: u64) -> Lcg64Xsh32 {
    let mut bytes = [0u8; 16];
    bytes[0..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&seed.to_le_bytes());
    Lcg64Xsh32::from_seed(bytes)
}

fn template(id: u32, weight: f64) -> SummonTemplate {
    SummonTemplate {
        id,
        name: format!("template-{id}"),
        element: Element::Earth,
        base_stats: StatBlock {
            hp: 1000,
            attack: 300,
            defense: 200,
            speed: 75,
        },
        skills: vec![SkillTemplate {
            name: "stone fist".to_string(),
            slot: 1,
            damage: 120,
            scaling_stat: ScalingStat::Attack,
            scaling_percent: 15.0,
            cooldown: 3,
            max_level: 5,
        }],
        summon_weight: weight,
    }
}

#[test]
fn empty_pool_is_rejected() {
    let err = draw_template(&[], &mut rng(1)).expect_err("empty pool must fail");
    assert!(matches!(err, EngineError::NoTemplatesAvailable));
}

#[test]
fn negative_weight_is_rejected() {
    let pool = vec![template(1, 0.5), template(2, -0.1)];
    let err = draw_template(&pool, &mut rng(1)).expect_err("negative weight must fail");
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[test]
fn all_zero_weights_fall_back_to_the_first_template() {
    let pool = vec![template(1, 0.0), template(2, 0.0)];
    for seed in 0..10 {
        let drawn = draw_template(&pool, &mut rng(seed)).expect("draw should succeed");
        assert_eq!(drawn.id, 1);
    }
}

#[test]
fn draw_frequencies_track_the_weights() {
    let pool = vec![template(1, 0.7), template(2, 0.3)];
    let mut rng = rng(12345);

    let mut first = 0usize;
    let draws = 10_000;
    for _ in 0..draws {
        if draw_template(&pool, &mut rng).expect("draw should succeed").id == 1 {
            first += 1;
        }
    }
    // 0.7 of 10k draws, with generous slack for sampling noise.
    assert!((6_500..=7_500).contains(&first), "got {first} of {draws}");
}

#[test]
fn weights_are_relative_not_absolute() {
    // 7/3 must behave the same as 0.7/0.3.
    let pool = vec![template(1, 7.0), template(2, 3.0)];
    let mut rng = rng(999);
    let mut first = 0usize;
    for _ in 0..10_000 {
        if draw_template(&pool, &mut rng).expect("draw should succeed").id == 1 {
            first += 1;
        }
    }
    assert!((6_500..=7_500).contains(&first), "got {first}");
}

#[test]
fn materialized_combatant_starts_fresh() {
    let t = template(3, 1.0);
    let c = materialize(&t, "collector");

    assert_eq!(c.id, 0);
    assert_eq!(c.owner, "collector");
    assert_eq!(c.template_id, 3);
    assert_eq!(c.name, t.name);
    assert_eq!(c.level, 1);
    assert_eq!(c.experience, 0.0);
    assert_eq!(c.experience_to_next_level, 100.0);
    assert_eq!(c.skill_points, 3);
    assert_eq!(c.base_stats, t.base_stats);
    assert_eq!(c.current_hp, 1000);

    assert_eq!(c.skills.len(), 1);
    let skill = &c.skills[0];
    assert_eq!(skill.level, 0);
    assert_eq!(skill.remaining, 0);
    assert_eq!(skill.cooldown, 3);
    assert_eq!(skill.base_cooldown, 3);
    assert!(skill.is_ready());
}

#[test]
fn materialized_skills_are_independent_copies() {
    let t = template(4, 1.0);
    let mut first = materialize(&t, "collector");
    let second = materialize(&t, "collector");

    first.skill_points = 1;
    first.upgrade_skill(1).expect("upgrade");
    assert_eq!(first.skills[0].level, 1);
    assert_eq!(second.skills[0].level, 0);
    assert_eq!(t.skills[0].damage, 120);
}
