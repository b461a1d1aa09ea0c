//! Balance checks against realistic Luau sources

use luaguard_validate::{ValidationMode, Validator};

const REALISTIC: &str = r#"
--!strict
-- player spawner service

local Players = game:GetService("Players")
local SPAWN_POINTS = { "A", "B", "C" }

local function pickSpawn(index: number): string
    if index < 1 then
        return SPAWN_POINTS[1]
    elseif index > #SPAWN_POINTS then
        return SPAWN_POINTS[#SPAWN_POINTS]
    else
        return SPAWN_POINTS[index]
    end
end

local banner = [[
welcome!
this text contains an end keyword and a ) that must not count
]]

Players.PlayerAdded:Connect(function(player)
    local tries = 0
    repeat
        tries = tries + 1
        task.wait(0.5)
    until tries >= 3

    for i = 1, #SPAWN_POINTS do
        while not player.Character do
            task.wait(0.1)
        end
        print(pickSpawn(i), banner)
    end
end)
"#;

#[test]
fn realistic_script_is_balanced() {
    let result = Validator::new().check_balance(REALISTIC);
    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
}

#[test]
fn truncating_realistic_script_reports_every_unclosed_opener() {
    // cut right after the `while` header line
    let cut = REALISTIC.find("task.wait(0.1)").unwrap();
    let truncated = &REALISTIC[..cut];
    let result = Validator::new().check_balance(truncated);
    assert!(!result.is_valid());

    // function (anonymous), for, while are all still open; the Connect
    // paren and the call paren are unclosed too
    let messages: Vec<_> = result.errors.iter().map(|e| e.message.as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("missing close for function")));
    assert!(messages.iter().any(|m| m.contains("missing close for for")));
    assert!(messages.iter().any(|m| m.contains("missing close for while")));
    assert!(messages.iter().any(|m| m.contains("missing ')'")));
}

#[test]
fn differential_mode_only_blames_the_edit() {
    let cut = REALISTIC.find("task.wait(0.1)").unwrap();
    let broken_baseline = &REALISTIC[..cut];
    // the edit appends an unterminated string on top of old breakage
    let edited = format!("{broken_baseline}\nlocal s = 'oops");

    let strict = Validator::new().validate(broken_baseline, &edited, ValidationMode::Strict);
    let differential =
        Validator::new().validate(broken_baseline, &edited, ValidationMode::Differential);

    assert!(strict.errors.len() > differential.errors.len());
    assert_eq!(differential.errors.len(), 1);
    assert!(differential.errors[0].message.contains("unterminated string"));
}
