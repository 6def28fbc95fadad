//! Traditional-to-simplified Chinese conversion.
//!
//! Whisper-style ASR output for Chinese audio arrives in either script, so
//! subtitle text is normalized to simplified characters before display. The
//! conversion is a pure character-for-character mapping: no mapped value is
//! itself a mapped key, which makes the function idempotent.

use once_cell::sync::Lazy;
use std::collections::HashMap;

// Each TRADITIONAL[i] maps to SIMPLIFIED[i]; the two tables must stay aligned
// line for line (20 characters per line).
const TRADITIONAL: &str = concat!(
    "這個們來時沒說對會學後發經還過現點樣開間",
    "問題聽覺讓頭實認為與當體關係愛應該話兒電",
    "視機東買賣錢場馬鳥魚車門長風雲飛書畫數語",
    "記詞讀寫譯論講談請謝離難歡觀頁顏預順須領",
    "幾產親熱鐘錯鐵銀錄鏡鍵鎖錦鋼銷鋪閉閱閃閣",
    "陽陰階際隨隱雜雙雞霧靈靜韻項頂頻顯飯飲餓",
    "館餘駕駛驗驚騎髒髮鬆鬧鬥魯麥黃齊齒龍龜萬",
    "專業叢絲丟兩嚴喪豐臨麗舉麼義烏樂喬習鄉亂",
    "爭虧亞億僅從倉儀價眾優傳傷倫偽俠侶僥偵側",
    "僑倆儉債傾儲僕偉傑備兌黨蘭養獸內岡冊軍農",
    "馮沖決況凍淨涼減湊凜鳳憑凱擊鑿劃劉則剛創",
    "刪別劑劇勸辦務動勵勁勞勢勳勝匯區醫華協單",
    "壓厭廠廳歷曆厲參變疊嘆嗎員呂啟吳喚喲嗚嘩",
    "噴嚇噸嚨圍園國圖團聖堅壇壞壘塊墊墳報墮處",
    "婦媽奮奪奧娛嬌孫寧寶審寬導將尋層屬歲峽島",
    "崗嶺帥師帶幫幹併廣慶廬廢異棄張彈強歸彥徵",
    "憶懷態憲慮憤悅惱悶慚慣懼憐戰戲戶撲執擴擾",
    "掃揚擇撐搶護擔據擠攜攝攤擺撿擁攔撥挾捨掙",
    "斷無舊晝曉暈暫曠術樸權條標樓檢楊榮樹橫檔",
    "漢滿漸濟濃測湯淚潔澤滅燈燒爛煙爐營濕潤滾",
    "環瑪畢療瘋鹽監盡盤盧礦碼磚確礎禮禍種稱積",
    "穀穩窮竊筆築簡籃籌簽節範類糾紅級紀純納紛",
    "紙紋線練組細織終絕統絡給繼續維綜綠緊網緒",
    "編緣縣縮總績繩繪纏縱罰罵罷羅聯聰聲職聞肅",
    "膚膠腦腸膽臟臉臺艱蘇蘋藝藥蟲蝦衛補裝裡製",
    "複褲襯見規覽觸計訂訓訊訪設許診註證評識譜",
    "議譽讚豬貓貝負貢財責賢敗貨質販貪貧購費賀",
    "資賓賽贈趕趙跡踐躍軌載輸輕輪轉輛較輝辭邊",
    "達遷運遠違連遲適選遺遞鄰釋針釣鈴鉛銅鋒銳",
    "鍋鎮鏈閘隊隻雖顧餅飽驅骯鴨鵝鹹龐廟壽夢獎",
    "試詩誰誤課願號遊氣約綱腳幣敵極構橋歐殺進",
    "煩爾牆獨競葉藍調貴陳響戀淺錶鬍擬殘毀騰襲",
);

const SIMPLIFIED: &str = concat!(
    "这个们来时没说对会学后发经还过现点样开间",
    "问题听觉让头实认为与当体关系爱应该话儿电",
    "视机东买卖钱场马鸟鱼车门长风云飞书画数语",
    "记词读写译论讲谈请谢离难欢观页颜预顺须领",
    "几产亲热钟错铁银录镜键锁锦钢销铺闭阅闪阁",
    "阳阴阶际随隐杂双鸡雾灵静韵项顶频显饭饮饿",
    "馆余驾驶验惊骑脏发松闹斗鲁麦黄齐齿龙龟万",
    "专业丛丝丢两严丧丰临丽举么义乌乐乔习乡乱",
    "争亏亚亿仅从仓仪价众优传伤伦伪侠侣侥侦侧",
    "侨俩俭债倾储仆伟杰备兑党兰养兽内冈册军农",
    "冯冲决况冻净凉减凑凛凤凭凯击凿划刘则刚创",
    "删别剂剧劝办务动励劲劳势勋胜汇区医华协单",
    "压厌厂厅历历厉参变叠叹吗员吕启吴唤哟呜哗",
    "喷吓吨咙围园国图团圣坚坛坏垒块垫坟报堕处",
    "妇妈奋夺奥娱娇孙宁宝审宽导将寻层属岁峡岛",
    "岗岭帅师带帮干并广庆庐废异弃张弹强归彦征",
    "忆怀态宪虑愤悦恼闷惭惯惧怜战戏户扑执扩扰",
    "扫扬择撑抢护担据挤携摄摊摆捡拥拦拨挟舍挣",
    "断无旧昼晓晕暂旷术朴权条标楼检杨荣树横档",
    "汉满渐济浓测汤泪洁泽灭灯烧烂烟炉营湿润滚",
    "环玛毕疗疯盐监尽盘卢矿码砖确础礼祸种称积",
    "谷稳穷窃笔筑简篮筹签节范类纠红级纪纯纳纷",
    "纸纹线练组细织终绝统络给继续维综绿紧网绪",
    "编缘县缩总绩绳绘缠纵罚骂罢罗联聪声职闻肃",
    "肤胶脑肠胆脏脸台艰苏苹艺药虫虾卫补装里制",
    "复裤衬见规览触计订训讯访设许诊注证评识谱",
    "议誉赞猪猫贝负贡财责贤败货质贩贪贫购费贺",
    "资宾赛赠赶赵迹践跃轨载输轻轮转辆较辉辞边",
    "达迁运远违连迟适选遗递邻释针钓铃铅铜锋锐",
    "锅镇链闸队只虽顾饼饱驱肮鸭鹅咸庞庙寿梦奖",
    "试诗谁误课愿号游气约纲脚币敌极构桥欧杀进",
    "烦尔墙独竞叶蓝调贵陈响恋浅表胡拟残毁腾袭",
);

static TABLE: Lazy<HashMap<char, char>> = Lazy::new(|| {
    TRADITIONAL.chars().zip(SIMPLIFIED.chars()).collect()
});

/// Convert traditional Chinese characters to simplified, leaving everything
/// else untouched.
pub fn to_simplified(text: &str) -> String {
    text.chars()
        .map(|c| TABLE.get(&c).copied().unwrap_or(c))
        .collect()
}
