pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const NEW: &str = "✨";
    pub const DATABASE: &str = "🗄️";
    pub const REPEAT: &str = "🔁";
    pub const SKIP: &str = "⏭️";
    pub const BULB: &str = "💡";
    pub const GLOBE: &str = "🌍";
    pub const STOP: &str = "🛑";
}
