// Canned guidance used whenever the completion relay cannot answer.

pub const DEFAULT_FALLBACK: &str =
    "The universe has a unique message for your situation. Trust in the wisdom of this path.";

/// Fallback text for a path id. Unknown ids get `DEFAULT_FALLBACK`.
pub fn fallback_text(path_id: u8) -> &'static str {
    match path_id {
        1 => "Your dilemma requires bold action. Like Agni's flame, burn through hesitation. Take that leap of faith - your passion will guide you through any obstacles.",
        2 => "Patience, dear seeker. Like Shesha holding the universe, some things require time to unfold. Observe the patterns and trust in the process.",
        3 => "Question everything you think you know about this situation. Maya's mirror shows that reality has layers. Look deeper than the surface.",
        4 => "Your duty calls, warrior. Like Arjuna on the battlefield, face your responsibilities. Clarity comes through righteous action.",
        5 => "Flow like water, adapt like the ocean. Don't force outcomes - work with the currents while maintaining your direction.",
        6 => "Gather knowledge before you act. Consult mentors and understand all angles. Informed decisions create the strongest foundation.",
        7 => "Step back from the noise and chaos. Create sacred space for reflection. Your inner voice holds the answer in stillness.",
        8 => "Strike now while opportunity presents itself. Like Indra's lightning, decisive action creates power. Trust your judgment.",
        9 => "Choose the path that brings beauty and prosperity. Trust that abundance is your birthright. Honor both practical needs and desires.",
        10 => "Your gut feeling is speaking - listen to it. Beyond logic lies ancient wisdom. Trust this primal knowing above reasoning.",
        11 => "It's time to build something new. Plan carefully, gather resources, and create step by step. Craft your solution with care.",
        12 => "Do what is right, even if difficult. Your moral compass knows the answer. Choose integrity over convenience.",
        13 => "Release your need to control the outcome. Time is your ally. Practice acceptance and let the universe provide clarity.",
        14 => "Cut through all illusions and face the raw truth. Embrace transformation, however uncomfortable it may be.",
        _ => DEFAULT_FALLBACK,
    }
}
